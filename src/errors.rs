use thiserror::Error;

/// All errors that can occur in Bento.
#[derive(Debug, Error)]
pub enum BentoError {
    // --- PIN errors ---
    #[error("PIN must be at least {0} characters long")]
    WeakPin(usize),

    #[error("Incorrect PIN")]
    InvalidPin,

    #[error("New PINs do not match")]
    PinMismatch,

    // --- Vault errors ---
    #[error("Vault is locked — unlock it with your PIN first")]
    VaultLocked,

    #[error("No vault configured yet — set a PIN with `bento pin set`")]
    NoVaultConfigured,

    #[error("A PIN is already set for this vault (use `bento pin change`)")]
    AlreadyInitialized,

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("Could not decrypt password — wrong PIN or corrupted entry")]
    Decrypt,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Transfer errors ---
    #[error("Invalid backup file: {0}")]
    InvalidSnapshot(String),

    // --- Storage errors (fatal) ---
    #[error("Storage failure on '{name}': {reason}")]
    Storage { name: String, reason: String },

    #[error("Stored document '{name}' is corrupted: {reason}")]
    CorruptDocument { name: String, reason: String },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl BentoError {
    /// Shorthand for a missing record of the given kind.
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns `true` for durable-storage failures.
    ///
    /// Everything else is recoverable and reported back to the user.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::CorruptDocument { .. })
    }
}

/// Convenience type alias for Bento results.
pub type Result<T> = std::result::Result<T, BentoError>;
