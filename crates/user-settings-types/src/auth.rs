//! Authenticated caller context and roles.

use crate::types::KeycloakId;

/// Role carried in the access token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
	Officer,
	Citizen,
}

impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Role::Officer => "officer",
			Role::Citizen => "citizen",
		}
	}
}

/// Context struct for an authenticated user
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub keycloak_id: KeycloakId,
	pub username: Option<Box<str>>,
	pub roles: Box<[Box<str>]>,
}

impl AuthCtx {
	pub fn has_role(&self, role: Role) -> bool {
		self.roles.iter().any(|r| r.as_ref() == role.as_str())
	}

	pub fn is_officer(&self) -> bool {
		self.has_role(Role::Officer)
	}

	pub fn is_citizen(&self) -> bool {
		self.has_role(Role::Citizen)
	}
}


// vim: ts=4
