use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

/// Everything that can go wrong while compiling a stylesheet.
///
/// Kinds are flat on purpose: the pipeline stops at the first failure
/// and the caller only ever sees a single one of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unexpected character")]
    UnexpectedCharacter,

    #[error("unexpected end of file")]
    UnexpectedEndOfFile,

    #[error("class selector can only contain alphanumeric characters, '-' or '_'")]
    ClassSelectorCanOnlyContainsAlphaChar,

    #[error("id selector can only contain alphanumeric characters, '-' or '_'")]
    IdSelectorCanOnlyContainsAlphaChar,

    #[error("identifier can only contain alphanumeric characters, '-' or '_'")]
    IdentifierCanOnlyContainsAlphaChar,

    #[error("property name can only contain alphanumeric characters, '-' or '_'")]
    PropertyNameCanOnlyContainsAlphaChar,

    #[error("property value contains an invalid character")]
    PropertyValueCanOnlyContainsAlphaChar,

    #[error("property value cannot be empty")]
    PropertyValueCannotBeEmpty,

    #[error("property value cannot contain CR or LF")]
    PropertyValueCannotContainCRLF,

    #[error("property value must end with a semicolon")]
    PropertyValueMustEndWithASemicolon,

    #[error("CR or LF is not allowed between a property value and its semicolon")]
    NoCRLFBetweenPropertyValueAndSemicolon,

    #[error("variable name can only contain alphanumeric characters, '-' or '_'")]
    VariableNameCanOnlyContainsAlphaChar,

    #[error("variable name cannot contain CR or LF")]
    VariableNameCannotContainCRLF,

    #[error("variable value cannot contain CR or LF")]
    VariableValueCannotContainCRLF,

    #[error("construct is not supported by this subset")]
    NotImplemented,

    #[error("reference to an undefined variable")]
    UndefinedVariable,
}
