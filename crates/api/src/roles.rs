// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role administration.
//!
//! System roles are mutation-restricted: only description and status may
//! change, and they can never be deleted. Any role still referenced by a
//! user cannot be deleted either.

use agrisure::authorize;
use agrisure_domain::{Action, DomainError, Resource, Role, RoleName, RoleStatus};
use agrisure_persistence::Store;
use std::str::FromStr;

use crate::auth::Principal;
use crate::dto::{CreateRoleRequest, RoleDto, UpdateRoleRequest};
use crate::error::ApiError;

fn role_or_not_found(store: &Store, name: &RoleName) -> Result<Role, ApiError> {
    store
        .role_by_name(name.value())?
        .ok_or_else(|| ApiError::NotFound(format!("Role '{}'", name.value())))
}

/// Creates a custom role.
///
/// # Errors
///
/// Returns an error if the caller is not permitted, the name is invalid or
/// taken, or persistence fails.
pub fn create(
    store: &Store,
    principal: &Principal,
    request: &CreateRoleRequest,
) -> Result<RoleDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Roles,
        Action::Create,
    )?;

    let name: RoleName = RoleName::new(&request.name)?;
    if store.role_by_name(name.value())?.is_some() {
        return Err(ApiError::Validation(format!(
            "Role '{}' already exists",
            name.value()
        )));
    }

    let role: Role = Role {
        role_id: None,
        name,
        description: request.description.clone(),
        status: RoleStatus::Active,
        is_system_role: false,
        permissions: request.permissions.clone(),
    };
    store.insert_role(&role)?;
    Ok(RoleDto::from(&role_or_not_found(store, &role.name)?))
}

/// Lists all roles.
///
/// # Errors
///
/// Returns an error if the caller is not permitted.
pub fn list(store: &Store, principal: &Principal) -> Result<Vec<RoleDto>, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Roles,
        Action::Read,
    )?;
    let roles: Vec<Role> = store.list_roles()?;
    Ok(roles.iter().map(RoleDto::from).collect())
}

/// Retrieves a role by name.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or the role does not
/// exist.
pub fn get(store: &Store, principal: &Principal, name: &str) -> Result<RoleDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Roles,
        Action::Read,
    )?;
    let role_name: RoleName = RoleName::new(name)?;
    Ok(RoleDto::from(&role_or_not_found(store, &role_name)?))
}

/// Updates a role.
///
/// For system roles only the description and status may change; a request
/// that tries to change a system role's permissions is rejected.
///
/// # Errors
///
/// Returns an error if the caller is not permitted, the role does not
/// exist, or the request violates system-role restrictions.
pub fn update(
    store: &Store,
    principal: &Principal,
    name: &str,
    request: &UpdateRoleRequest,
) -> Result<RoleDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Roles,
        Action::Update,
    )?;

    let role_name: RoleName = RoleName::new(name)?;
    let mut role: Role = role_or_not_found(store, &role_name)?;

    if role.is_system_role && request.permissions.is_some() {
        return Err(DomainError::SystemRoleImmutable {
            role: role.name.value().to_string(),
        }
        .into());
    }

    if let Some(description) = &request.description {
        role.description = Some(description.clone());
    }
    if let Some(status) = &request.status {
        role.status = RoleStatus::from_str(status)?;
    }
    if let Some(permissions) = &request.permissions {
        role.permissions = permissions.clone();
    }

    store.update_role(&role)?;
    Ok(RoleDto::from(&role_or_not_found(store, &role_name)?))
}

/// Deletes a custom role.
///
/// System roles and roles still held by any user cannot be deleted.
///
/// # Errors
///
/// Returns an error if the caller is not permitted, the role does not
/// exist, or a deletion guard applies.
pub fn delete(store: &Store, principal: &Principal, name: &str) -> Result<(), ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Roles,
        Action::Delete,
    )?;

    let role_name: RoleName = RoleName::new(name)?;
    let role: Role = role_or_not_found(store, &role_name)?;

    if role.is_system_role {
        return Err(DomainError::SystemRoleUndeletable {
            role: role.name.value().to_string(),
        }
        .into());
    }
    let holders: i64 = store.count_users_with_role(role.name.value())?;
    if holders > 0 {
        return Err(DomainError::RoleInUse {
            role: role.name.value().to_string(),
            user_count: holders,
        }
        .into());
    }

    store.delete_role(role.name.value())?;
    Ok(())
}
