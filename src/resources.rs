//! Resources exposed by the Addy provider.

use crate::error::ProviderError;
use crate::schema::Schema;

/// Every resource type the provider registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// `addy_domain`
    Domain,
}

/// A resource lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create a new remote object.
    Create,
    /// Refresh state from the remote object.
    Read,
    /// Update the remote object in place.
    Update,
    /// Delete the remote object.
    Delete,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl ResourceKind {
    /// All registered resources.
    pub const ALL: [ResourceKind; 1] = [Self::Domain];

    /// Type name as seen by the host.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Domain => "addy_domain",
        }
    }

    /// Look up a resource by type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    /// Schema of this resource's state.
    pub fn schema(self) -> Schema {
        match self {
            Self::Domain => Schema::v0().with_description("A custom domain on the Addy account."),
        }
    }

    /// Error returned for lifecycle operations that are registered but not built.
    pub fn unimplemented(self, operation: Operation) -> ProviderError {
        ProviderError::Unimplemented(format!(
            "{} {} is not supported yet",
            self.type_name(),
            operation.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(
            ResourceKind::from_type_name("addy_domain"),
            Some(ResourceKind::Domain)
        );
        assert_eq!(ResourceKind::from_type_name("addy_alias"), None);
    }

    #[test]
    fn test_unimplemented_message() {
        let err = ResourceKind::Domain.unimplemented(Operation::Delete);
        assert_eq!(
            err.to_string(),
            "Not implemented: addy_domain delete is not supported yet"
        );
    }
}
