//! Key model.

/// Key types. `Custom` passes unknown kinds through verbatim, like column
/// types do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyType {
    Index,
    Primary,
    Unique,
    Foreign,
    Custom(String),
}

/// Pending operation carried by a key entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOperation {
    #[default]
    Add,
    Drop,
}

/// One index/constraint definition or pending alteration.
#[derive(Debug, Clone)]
pub struct Key {
    name: String,
    key_type: KeyType,
    operation: KeyOperation,
    columns: Vec<String>,
}

impl Key {
    /// Create a key with the given name and type, flagged as an addition.
    pub fn new(name: impl Into<String>, key_type: KeyType) -> Self {
        Self {
            name: name.into(),
            key_type,
            operation: KeyOperation::Add,
            columns: Vec::new(),
        }
    }

    /// Set the key name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Set the key type.
    pub fn key_type(&mut self, key_type: KeyType) -> &mut Self {
        self.key_type = key_type;
        self
    }

    /// Set the covered columns, in order.
    pub fn columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add a single covered column.
    pub fn column(&mut self, column: impl Into<String>) -> &mut Self {
        self.columns.push(column.into());
        self
    }

    /// Flag this entry as a drop.
    pub fn drop(&mut self) -> &mut Self {
        self.operation = KeyOperation::Drop;
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> &KeyType {
        &self.key_type
    }

    pub fn get_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get_operation(&self) -> KeyOperation {
        self.operation
    }
}
