//! SDL document model
//!
//! Structured output of [`Inferrer::infer`](crate::inferrer::Inferrer::infer).
//! Built fresh for every call and rendered through `Display`.

use std::fmt;

/// An ordered sequence of type declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdlDocument {
    pub types: Vec<GqlType>,
}

impl SdlDocument {
    pub fn new(types: Vec<GqlType>) -> Self {
        Self { types }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Look up a type by its rendered name
    pub fn get(&self, name: &str) -> Option<&GqlType> {
        self.types.iter().find(|t| t.name == name)
    }
}

impl fmt::Display for SdlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", ty)?;
        }
        Ok(())
    }
}

/// A type declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GqlType {
    pub name: String,
    pub fields: Vec<GqlField>,
    /// Directives attached to the type header, rendered in order
    pub directives: Vec<String>,
    /// Reserved for embedded types; never set by the inferrer yet
    pub is_embedded: bool,
}

impl GqlType {
    pub fn new(name: impl Into<String>, fields: Vec<GqlField>, directives: Vec<String>) -> Self {
        Self {
            name: name.into(),
            fields,
            directives,
            is_embedded: false,
        }
    }
}

impl fmt::Display for GqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {}", self.name)?;
        for directive in &self.directives {
            write!(f, " {}", directive)?;
        }
        writeln!(f, " {{")?;
        for field in &self.fields {
            writeln!(f, "  {}", field)?;
        }
        writeln!(f, "}}")
    }
}

/// A field declaration. `infer` leaves field lists empty for now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GqlField {
    pub name: String,
    pub type_name: String,
    pub is_required: bool,
    pub directives: Vec<String>,
}

impl GqlField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, is_required: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_required,
            directives: Vec::new(),
        }
    }
}

impl fmt::Display for GqlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let required = if self.is_required { "!" } else { "" };
        write!(f, "{}: {}{}", self.name, self.type_name, required)?;
        for directive in &self.directives {
            write!(f, " {}", directive)?;
        }
        Ok(())
    }
}
