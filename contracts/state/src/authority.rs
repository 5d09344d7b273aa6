//! Plugin authorities.
//!
//! `Owner` and `UpdateAuthority` are relational: they name whoever currently
//! holds that role on the account and are never cached as keys. Resolving one
//! is a two-step process: build an [`AuthorityContext`] from the current base
//! record, then resolve the authority against it.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::Pubkey;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluginAuthority {
    None,
    Owner,
    UpdateAuthority,
    Address { address: Pubkey },
}

/// Current role holders an authority is resolved against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorityContext {
    /// Current asset owner (collections have none)
    pub owner: Option<Pubkey>,
    /// Effective update authority, already resolved through the collection if needed
    pub update_authority: Option<Pubkey>,
}

impl PluginAuthority {
    pub fn address(address: Pubkey) -> Self {
        Self::Address { address }
    }

    /// Resolves the authority to a concrete key, if anyone currently holds it.
    pub fn resolve(&self, ctx: &AuthorityContext) -> Option<Pubkey> {
        match self {
            PluginAuthority::None => None,
            PluginAuthority::Owner => ctx.owner,
            PluginAuthority::UpdateAuthority => ctx.update_authority,
            PluginAuthority::Address { address } => Some(*address),
        }
    }

    pub fn is_satisfied_by(&self, candidate: &Pubkey, ctx: &AuthorityContext) -> bool {
        self.resolve(ctx).as_ref() == Some(candidate)
    }

    /// True only for an explicit `Address` equal to `key`.
    pub fn is_address(&self, key: &Pubkey) -> bool {
        matches!(self, PluginAuthority::Address { address } if address == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relational_resolution_tracks_context() {
        let owner_a = [1u8; 32];
        let owner_b = [2u8; 32];
        let ua = [3u8; 32];

        let before = AuthorityContext {
            owner: Some(owner_a),
            update_authority: Some(ua),
        };
        let after = AuthorityContext {
            owner: Some(owner_b),
            ..before
        };

        assert!(PluginAuthority::Owner.is_satisfied_by(&owner_a, &before));
        assert!(!PluginAuthority::Owner.is_satisfied_by(&owner_a, &after));
        assert!(PluginAuthority::Owner.is_satisfied_by(&owner_b, &after));
        assert!(PluginAuthority::UpdateAuthority.is_satisfied_by(&ua, &after));
    }

    #[test]
    fn test_none_matches_nobody() {
        let ctx = AuthorityContext {
            owner: Some([1u8; 32]),
            update_authority: Some([1u8; 32]),
        };
        assert_eq!(PluginAuthority::None.resolve(&ctx), None);
        assert!(!PluginAuthority::None.is_satisfied_by(&[1u8; 32], &ctx));
    }

    #[test]
    fn test_address_encoding() {
        let auth = PluginAuthority::address([9u8; 32]);
        let bytes = borsh::to_vec(&auth).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 3);
        assert_eq!(borsh::to_vec(&PluginAuthority::Owner).unwrap(), vec![1]);
        assert!(auth.is_address(&[9u8; 32]));
        assert!(!PluginAuthority::Owner.is_address(&[9u8; 32]));
    }
}
