use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Proposal title is required")]
    EmptyTitle,

    #[error("Proposal description is required")]
    EmptyDescription,

    #[error("Choice {index} is empty")]
    EmptyChoice { index: usize },

    #[error("A proposal needs at least {min} choices")]
    TooFewChoices { min: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address must start with 0x")]
    MissingPrefix,

    #[error("Address must be 20 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Address is not valid hex: {0}")]
    InvalidHex(String),
}
