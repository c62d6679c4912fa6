use serde::{Deserialize, Serialize};

/// Field kinds known to the DocType metadata model.
///
/// Kinds outside this list are carried verbatim in [`FieldKind::Other`] and
/// map to the `any` fallback when generating TypeScript.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Data,
    SmallText,
    TextEditor,
    Text,
    Code,
    Link,
    DynamicLink,
    ReadOnly,
    Password,
    Check,
    Int,
    Float,
    Currency,
    Percent,
    AttachImage,
    Attach,
    HtmlEditor,
    Image,
    Duration,
    Date,
    Datetime,
    Time,
    Phone,
    Color,
    LongText,
    MarkdownEditor,
    Select,
    Table,
    TableMultiSelect,
    SectionBreak,
    ColumnBreak,
    Html,
    Button,
    Fold,
    Heading,
    TabBreak,
    Break,
    /// Any kind this crate does not know about.
    Other(String),
}

impl FieldKind {
    /// Parse a kind from its display name (e.g. `"Small Text"`).
    pub fn parse(name: &str) -> Self {
        match name {
            "Data" => FieldKind::Data,
            "Small Text" => FieldKind::SmallText,
            "Text Editor" => FieldKind::TextEditor,
            "Text" => FieldKind::Text,
            "Code" => FieldKind::Code,
            "Link" => FieldKind::Link,
            "Dynamic Link" => FieldKind::DynamicLink,
            "Read Only" => FieldKind::ReadOnly,
            "Password" => FieldKind::Password,
            "Check" => FieldKind::Check,
            "Int" => FieldKind::Int,
            "Float" => FieldKind::Float,
            "Currency" => FieldKind::Currency,
            "Percent" => FieldKind::Percent,
            "Attach Image" => FieldKind::AttachImage,
            "Attach" => FieldKind::Attach,
            "HTML Editor" => FieldKind::HtmlEditor,
            "Image" => FieldKind::Image,
            "Duration" => FieldKind::Duration,
            "Date" => FieldKind::Date,
            "Datetime" => FieldKind::Datetime,
            "Time" => FieldKind::Time,
            "Phone" => FieldKind::Phone,
            "Color" => FieldKind::Color,
            "Long Text" => FieldKind::LongText,
            "Markdown Editor" => FieldKind::MarkdownEditor,
            "Select" => FieldKind::Select,
            "Table" => FieldKind::Table,
            "Table MultiSelect" => FieldKind::TableMultiSelect,
            "Section Break" => FieldKind::SectionBreak,
            "Column Break" => FieldKind::ColumnBreak,
            "HTML" => FieldKind::Html,
            "Button" => FieldKind::Button,
            "Fold" => FieldKind::Fold,
            "Heading" => FieldKind::Heading,
            "Tab Break" => FieldKind::TabBreak,
            "Break" => FieldKind::Break,
            other => FieldKind::Other(other.to_string()),
        }
    }

    /// Display name as used by the metadata model.
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Data => "Data",
            FieldKind::SmallText => "Small Text",
            FieldKind::TextEditor => "Text Editor",
            FieldKind::Text => "Text",
            FieldKind::Code => "Code",
            FieldKind::Link => "Link",
            FieldKind::DynamicLink => "Dynamic Link",
            FieldKind::ReadOnly => "Read Only",
            FieldKind::Password => "Password",
            FieldKind::Check => "Check",
            FieldKind::Int => "Int",
            FieldKind::Float => "Float",
            FieldKind::Currency => "Currency",
            FieldKind::Percent => "Percent",
            FieldKind::AttachImage => "Attach Image",
            FieldKind::Attach => "Attach",
            FieldKind::HtmlEditor => "HTML Editor",
            FieldKind::Image => "Image",
            FieldKind::Duration => "Duration",
            FieldKind::Date => "Date",
            FieldKind::Datetime => "Datetime",
            FieldKind::Time => "Time",
            FieldKind::Phone => "Phone",
            FieldKind::Color => "Color",
            FieldKind::LongText => "Long Text",
            FieldKind::MarkdownEditor => "Markdown Editor",
            FieldKind::Select => "Select",
            FieldKind::Table => "Table",
            FieldKind::TableMultiSelect => "Table MultiSelect",
            FieldKind::SectionBreak => "Section Break",
            FieldKind::ColumnBreak => "Column Break",
            FieldKind::Html => "HTML",
            FieldKind::Button => "Button",
            FieldKind::Fold => "Fold",
            FieldKind::Heading => "Heading",
            FieldKind::TabBreak => "Tab Break",
            FieldKind::Break => "Break",
            FieldKind::Other(name) => name,
        }
    }

    /// Purely presentational kinds that carry no data.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            FieldKind::SectionBreak
                | FieldKind::ColumnBreak
                | FieldKind::Html
                | FieldKind::Button
                | FieldKind::Fold
                | FieldKind::Heading
                | FieldKind::TabBreak
                | FieldKind::Break
        )
    }

    /// Kinds whose rows are instances of another (table) schema.
    pub fn is_table(&self) -> bool {
        matches!(self, FieldKind::Table | FieldKind::TableMultiSelect)
    }

    /// Kinds whose options name another schema.
    pub fn references_schema(&self) -> bool {
        matches!(
            self,
            FieldKind::Link | FieldKind::Table | FieldKind::TableMultiSelect
        )
    }

    /// Fixed TypeScript expression for scalar kinds.
    ///
    /// Returns `None` for kinds that need more context (`Select`, table kinds)
    /// and for kinds without a mapping.
    pub fn to_typescript(&self) -> Option<&'static str> {
        match self {
            FieldKind::Data
            | FieldKind::SmallText
            | FieldKind::TextEditor
            | FieldKind::Text
            | FieldKind::Code
            | FieldKind::Link
            | FieldKind::DynamicLink
            | FieldKind::ReadOnly
            | FieldKind::Password
            | FieldKind::AttachImage
            | FieldKind::Attach
            | FieldKind::HtmlEditor
            | FieldKind::Image
            | FieldKind::Duration
            | FieldKind::Date
            | FieldKind::Datetime
            | FieldKind::Time
            | FieldKind::Phone
            | FieldKind::Color
            | FieldKind::LongText
            | FieldKind::MarkdownEditor => Some("string"),
            FieldKind::Check => Some("0 | 1"),
            FieldKind::Int | FieldKind::Float | FieldKind::Currency | FieldKind::Percent => {
                Some("number")
            }
            _ => None,
        }
    }
}

impl From<String> for FieldKind {
    fn from(name: String) -> Self {
        FieldKind::parse(&name)
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How records of a schema are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingRule {
    /// Numeric, database-assigned names.
    Autoincrement,
    /// Any string-valued naming (by field, series, prompt, hash...).
    #[default]
    Named,
}

impl NamingRule {
    /// TypeScript type of the `name` field.
    pub fn name_type(&self) -> &'static str {
        match self {
            NamingRule::Autoincrement => "number",
            NamingRule::Named => "string",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display_name() {
        for name in ["Small Text", "Table MultiSelect", "HTML Editor", "Tab Break"] {
            assert_eq!(FieldKind::parse(name).as_str(), name);
        }
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = FieldKind::parse("Geolocation");
        assert_eq!(kind, FieldKind::Other("Geolocation".to_string()));
        assert_eq!(kind.to_string(), "Geolocation");
        assert_eq!(kind.to_typescript(), None);
    }

    #[test]
    fn test_scalar_typescript_mapping() {
        assert_eq!(FieldKind::Data.to_typescript(), Some("string"));
        assert_eq!(FieldKind::Check.to_typescript(), Some("0 | 1"));
        assert_eq!(FieldKind::Currency.to_typescript(), Some("number"));
        assert_eq!(FieldKind::Select.to_typescript(), None);
        assert_eq!(FieldKind::Table.to_typescript(), None);
    }

    #[test]
    fn test_layout_kinds() {
        assert!(FieldKind::SectionBreak.is_layout());
        assert!(FieldKind::Html.is_layout());
        assert!(!FieldKind::HtmlEditor.is_layout());
        assert!(!FieldKind::Data.is_layout());
    }

    #[test]
    fn test_serde_uses_display_name() {
        let kind: FieldKind = serde_json::from_str("\"Dynamic Link\"").unwrap();
        assert_eq!(kind, FieldKind::DynamicLink);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"Dynamic Link\"");
    }

    #[test]
    fn test_naming_rule_name_type() {
        assert_eq!(NamingRule::Autoincrement.name_type(), "number");
        assert_eq!(NamingRule::default().name_type(), "string");
    }
}
