use serde::{Deserialize, Serialize};

/// Kind of a scanned code element
///
/// Unknown kinds decode to [`CodeAtomType::Other`] instead of failing, so a newer
/// scanner never breaks an older graph builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeAtomType {
    Solution,
    Project,
    Namespace,
    Class,
    Interface,
    Struct,
    Record,
    Enum,
    Delegate,
    Method,
    Constructor,
    Property,
    Field,
    Event,
    /// Data transfer object, a class by another name
    Dto,
    ExternalPackage,
    #[serde(other)]
    Other,
}

/// Represents one scanned code element (type, member, package, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAtom {
    /// Stable identifier, reused as the graph node id
    pub id: String,

    /// Simple name
    pub name: String,

    /// Element kind
    #[serde(rename = "type")]
    pub atom_type: CodeAtomType,

    /// Containing namespace ("" when the scanner found none)
    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub file_path: Option<String>,

    #[serde(default)]
    pub line_number: Option<u32>,

    #[serde(default)]
    pub is_public: bool,

    #[serde(default)]
    pub signature: Option<String>,

    #[serde(default)]
    pub lines_of_code: Option<u32>,

    #[serde(default)]
    pub language: Option<String>,
}

impl CodeAtom {
    pub fn new(id: impl Into<String>, name: impl Into<String>, atom_type: CodeAtomType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            atom_type,
            namespace: String::new(),
            file_path: None,
            line_number: None,
            is_public: false,
            signature: None,
            lines_of_code: None,
            language: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_location(mut self, file_path: impl Into<String>, line_number: u32) -> Self {
        self.file_path = Some(file_path.into());
        self.line_number = Some(line_number);
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_lines_of_code(mut self, lines: u32) -> Self {
        self.lines_of_code = Some(lines);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Kind of a scanned SQL object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlAtomType {
    Table,
    View,
    StoredProcedure,
    /// User-defined function, graphed as a stored procedure
    Function,
    Column,
    #[serde(other)]
    Other,
}

/// Represents one scanned SQL object (table, view, procedure, column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlAtom {
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub atom_type: SqlAtomType,

    /// Owning table, for columns
    #[serde(default)]
    pub parent_table: Option<String>,

    /// Declared SQL data type, for columns
    #[serde(default)]
    pub data_type: Option<String>,

    #[serde(default)]
    pub is_nullable: bool,
}

impl SqlAtom {
    pub fn new(id: impl Into<String>, name: impl Into<String>, atom_type: SqlAtomType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            atom_type,
            parent_table: None,
            data_type: None,
            is_nullable: false,
        }
    }

    /// Create a column atom owned by `parent_table`
    pub fn column(
        id: impl Into<String>,
        name: impl Into<String>,
        parent_table: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            parent_table: Some(parent_table.into()),
            data_type: Some(data_type.into()),
            ..Self::new(id, name, SqlAtomType::Column)
        }
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }
}
