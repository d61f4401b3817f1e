/// Structural errors raised by the runtime
///
/// These are returned to the caller and never folded into a value: the
/// requested object, attribute or method does not exist, so the call fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Unknown object type: {0}")]
    UnknownType(String),

    #[error("Unknown attribute '{attribute}' on {type_name}")]
    UnknownAttribute { type_name: String, attribute: String },

    #[error("Attribute '{attribute}' on {type_name} is read-only")]
    ReadOnlyAttribute { type_name: String, attribute: String },

    #[error("Unknown method '{method}' on {type_name}")]
    UnknownMethod { type_name: String, method: String },

    #[error("Variable ${0} is not defined")]
    Unbound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn unknown_attribute(type_name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Error::UnknownAttribute {
            type_name: type_name.into(),
            attribute: attribute.into(),
        }
    }

    pub fn read_only(type_name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Error::ReadOnlyAttribute {
            type_name: type_name.into(),
            attribute: attribute.into(),
        }
    }

    pub fn unknown_method(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Error::UnknownMethod {
            type_name: type_name.into(),
            method: method.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
