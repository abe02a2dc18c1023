use serde::{Deserialize, Serialize};

/// opaque travel-profile key. the engine and stores are parameterized by
/// this id and never inspect what the profile means; walking speeds and the
/// like live entirely in the collaborators that build tables and resolve
/// access for a given profile.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileId(pub usize);

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "profile {}", self.0)
    }
}

/// maps profile names to dense [`ProfileId`]s, the same categorical-to-index
/// trick used for stops and trips.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    names: Vec<String>,
}

impl ProfileRegistry {
    pub fn new() -> ProfileRegistry {
        ProfileRegistry::default()
    }

    /// registers `name`, or returns the existing id if already registered.
    pub fn register(&mut self, name: &str) -> ProfileId {
        if let Some(id) = self.resolve(name) {
            return id;
        }
        let id = ProfileId(self.names.len());
        self.names.push(name.to_string());
        id
    }

    pub fn resolve(&self, name: &str) -> Option<ProfileId> {
        self.names.iter().position(|n| n == name).map(ProfileId)
    }

    pub fn name(&self, id: ProfileId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_register_is_idempotent_per_name() {
        let mut registry = ProfileRegistry::new();
        let walk = registry.register("walk");
        let wheelchair = registry.register("wheelchair");
        assert_ne!(walk, wheelchair);
        assert_eq!(registry.register("walk"), walk);
        assert_eq!(registry.resolve("wheelchair"), Some(wheelchair));
        assert_eq!(registry.name(walk), Some("walk"));
        assert_eq!(registry.len(), 2);
    }
}
