use wrapp_ioc::types::TypeInfo;

/// Errors when registering or retrieving a config
#[derive(thiserror::Error, Debug, Clone)]
pub enum ConfigError {
    /// A config of this type is already registered
    #[error("The Config type '{0}' is already registered")]
    AlreadyRegistered(TypeInfo),

    /// The stored config is not of the requested type
    #[error("The stored Config is not a '{0}'")]
    TypeMismatch(TypeInfo),
}
