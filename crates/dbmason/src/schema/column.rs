//! Column model.
//!
//! A [`Column`] describes either a column of a table being created or a
//! pending alteration to an existing column. Which one it is depends solely
//! on the facade method the enclosing [`Table`] is passed to; the model only
//! tags each entry with an [`Operation`].
//!
//! [`Table`]: crate::schema::table::Table

/// Logical column types, mapped per dialect to a physical type keyword.
///
/// `Custom` carries any type outside the enumerated set verbatim into the
/// generated DDL. This passthrough is deliberate: unknown types are not an
/// error, they are forwarded for the engine to judge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Binary,
    Boolean,
    Char,
    Date,
    DateTime,
    Decimal,
    Double,
    Enum,
    Float,
    Int,
    Json,
    LongText,
    MediumInt,
    MediumText,
    SmallInt,
    String,
    Text,
    Time,
    Timestamp,
    TinyInt,
    Custom(std::string::String),
}

/// Pending operation carried by a column entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    #[default]
    Add,
    Modify,
    Rename,
    Drop,
}

/// Numeric length/precision specification: a scalar digit count or a
/// (precision, scale) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Scalar(u32),
    Pair(u32, u32),
}

/// Column default: either a literal to be quoted into the DDL, or a raw SQL
/// expression interposed verbatim.
///
/// Raw defaults are a trust boundary: the caller is responsible for the
/// validity of the expression (`NOW()`, `CURRENT_TIMESTAMP`, ...). No
/// escaping is applied to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Literal(String),
    Raw(String),
}

/// One column definition or pending alteration.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    old_name: Option<String>,
    column_type: ColumnType,
    operation: Operation,
    after: Option<String>,
    length: Option<u32>,
    precision: Option<Precision>,
    options: Vec<String>,
    nullable: Option<bool>,
    unsigned: bool,
    auto_increment: bool,
    default: Option<DefaultValue>,
}

impl Column {
    /// Create a column with the given name and type, flagged as an addition.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            old_name: None,
            column_type,
            operation: Operation::Add,
            after: None,
            length: None,
            precision: None,
            options: Vec::new(),
            nullable: None,
            unsigned: false,
            auto_increment: false,
            default: None,
        }
    }

    /// Set the column name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Set the column after which this column is inserted or moved.
    /// Only honored by dialects that support positional hints.
    pub fn after(&mut self, after: impl Into<String>) -> &mut Self {
        self.after = Some(after.into());
        self
    }

    /// Set the column type.
    pub fn column_type(&mut self, column_type: ColumnType) -> &mut Self {
        self.column_type = column_type;
        self
    }

    /// Set the column length.
    pub fn length(&mut self, length: u32) -> &mut Self {
        self.length = Some(length);
        self
    }

    /// Set a scalar precision.
    pub fn precision(&mut self, precision: u32) -> &mut Self {
        self.precision = Some(Precision::Scalar(precision));
        self
    }

    /// Set a (precision, scale) pair.
    pub fn precision_scale(&mut self, precision: u32, scale: u32) -> &mut Self {
        self.precision = Some(Precision::Pair(precision, scale));
        self
    }

    /// Set the option list for enumerated types.
    pub fn options<I, S>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the column nullable (or explicitly NOT NULL with `false`).
    pub fn nullable(&mut self, nullable: bool) -> &mut Self {
        self.nullable = Some(nullable);
        self
    }

    /// Mark the column unsigned.
    pub fn unsigned(&mut self) -> &mut Self {
        self.unsigned = true;
        self
    }

    /// Mark the column auto-incrementing.
    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = true;
        self
    }

    /// Set the column default as a quoted literal.
    pub fn default_value(&mut self, default: impl ToString) -> &mut Self {
        self.default = Some(DefaultValue::Literal(default.to_string()));
        self
    }

    /// Set the column default as a raw, unescaped SQL expression.
    pub fn default_raw(&mut self, default: impl Into<String>) -> &mut Self {
        self.default = Some(DefaultValue::Raw(default.into()));
        self
    }

    /// Flag this entry as a modification of an existing column.
    pub fn modify(&mut self) -> &mut Self {
        self.operation = Operation::Modify;
        self
    }

    /// Flag this entry as a rename. The current name becomes the old name
    /// and `name` the new one.
    pub fn rename(&mut self, name: impl Into<String>) -> &mut Self {
        self.old_name = Some(std::mem::replace(&mut self.name, name.into()));
        self.operation = Operation::Rename;
        self
    }

    /// Flag this entry as a drop.
    pub fn drop(&mut self) -> &mut Self {
        self.operation = Operation::Drop;
        self
    }

    /// Current (post-rename) column name.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Pre-rename column name; equal to the current name when no rename is
    /// pending.
    pub fn get_old_name(&self) -> &str {
        self.old_name.as_deref().unwrap_or(&self.name)
    }

    pub fn get_after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    pub fn get_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn get_length(&self) -> Option<u32> {
        self.length
    }

    pub fn get_precision(&self) -> Option<Precision> {
        self.precision
    }

    pub fn get_options(&self) -> &[String] {
        &self.options
    }

    pub fn get_default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn get_operation(&self) -> Operation {
        self.operation
    }

    /// Whether the column renders as NULL. Unset counts as NOT NULL.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
    }

    /// Whether the caller explicitly chose a nullability. Rename clauses use
    /// this to decide whether introspected attributes should be preserved.
    pub fn has_explicit_nullable(&self) -> bool {
        self.nullable.is_some()
    }

    /// Whether the caller explicitly set a default.
    pub fn has_explicit_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }
}
