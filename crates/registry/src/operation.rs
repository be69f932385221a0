use std::fmt;

/// Operations a registry answers to, keyed by their exact wire name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    Name,
    PublicKey,
    GetSchemaDetails,
    RegisterSchema,
    InjectClaim,
    RevokeClaim,
    IsValidClaim,
    /// Anything else, kept verbatim for the error message.
    Unknown(String),
}

impl Operation {
    pub const KNOWN: [Operation; 7] = [
        Operation::Name,
        Operation::PublicKey,
        Operation::GetSchemaDetails,
        Operation::RegisterSchema,
        Operation::InjectClaim,
        Operation::RevokeClaim,
        Operation::IsValidClaim,
    ];

    /// Exact, case-sensitive match.
    pub fn parse(name: &str) -> Self {
        match name {
            "Name" => Operation::Name,
            "PublicKey" => Operation::PublicKey,
            "GetSchemaDetails" => Operation::GetSchemaDetails,
            "RegisterSchema" => Operation::RegisterSchema,
            "InjectClaim" => Operation::InjectClaim,
            "RevokeClaim" => Operation::RevokeClaim,
            "IsValidClaim" => Operation::IsValidClaim,
            other => Operation::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operation::Name => "Name",
            Operation::PublicKey => "PublicKey",
            Operation::GetSchemaDetails => "GetSchemaDetails",
            Operation::RegisterSchema => "RegisterSchema",
            Operation::InjectClaim => "InjectClaim",
            Operation::RevokeClaim => "RevokeClaim",
            Operation::IsValidClaim => "IsValidClaim",
            Operation::Unknown(name) => name,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_parse_back() {
        for op in Operation::KNOWN {
            assert_eq!(Operation::parse(op.as_str()), op);
        }
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(
            Operation::parse("injectclaim"),
            Operation::Unknown("injectclaim".to_string())
        );
        assert_eq!(
            Operation::parse(" Name"),
            Operation::Unknown(" Name".to_string())
        );
    }
}
