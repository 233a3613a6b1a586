//! Access scoping: maps an authenticated principal to the base visibility
//! predicate for each entity collection.
//!
//! Three principal kinds exist. Superusers see every row. Staff see exactly
//! the rows they created; rows without a creator are excluded. Dealer-class
//! principals see the rows they created for the creator-attributed
//! collections, and for supplies the rows belonging to their linked dealer
//! profile (the empty set when no profile is linked).
//!
//! Every caller-supplied filter composes conjunctively on top of these
//! predicates; nothing downstream can widen past them.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition};

use crate::entities::{dealer, product_supply, user};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalKind {
    Superuser,
    Staff,
    /// Non-staff login, usually provisioned for a dealer. `dealer_id` is the
    /// linked dealer profile, when one exists.
    DealerUser { dealer_id: Option<i64> },
}

/// The authenticated actor a request runs as.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub kind: PrincipalKind,
}

impl Principal {
    pub fn from_parts(account: &user::Model, dealer_id: Option<i64>) -> Self {
        let kind = if account.is_superuser {
            PrincipalKind::Superuser
        } else if account.is_staff {
            PrincipalKind::Staff
        } else {
            PrincipalKind::DealerUser { dealer_id }
        };
        Self {
            id: account.id,
            username: account.username.clone(),
            kind,
        }
    }

    /// Principal used when authentication is disabled by configuration:
    /// superuser-equivalent, all rows visible.
    pub fn system() -> Self {
        Self {
            id: 0,
            username: "system".to_string(),
            kind: PrincipalKind::Superuser,
        }
    }

    pub fn is_superuser(&self) -> bool {
        self.kind == PrincipalKind::Superuser
    }

    pub fn linked_dealer_id(&self) -> Option<i64> {
        match self.kind {
            PrincipalKind::DealerUser { dealer_id } => dealer_id,
            _ => None,
        }
    }
}

/// Predicate that matches no rows.
fn nothing() -> Condition {
    Condition::all().add(Expr::val(1).eq(0))
}

/// Base visibility for a creator-attributed collection (roles, branches,
/// dealers), keyed on that collection's `created_by` column.
pub fn created_rows_scope<C: ColumnTrait>(principal: &Principal, created_by: C) -> Condition {
    match principal.kind {
        PrincipalKind::Superuser => Condition::all(),
        // Ownership-only rule: a null creator matches nobody.
        PrincipalKind::Staff | PrincipalKind::DealerUser { .. } => {
            Condition::all().add(created_by.eq(principal.id))
        }
    }
}

/// Base visibility for the supply collection.
pub fn supply_scope(principal: &Principal) -> Condition {
    match principal.kind {
        PrincipalKind::Superuser => Condition::all(),
        PrincipalKind::Staff => {
            Condition::all().add(product_supply::Column::CreatedBy.eq(principal.id))
        }
        PrincipalKind::DealerUser {
            dealer_id: Some(dealer_id),
        } => Condition::all().add(product_supply::Column::DealerId.eq(dealer_id)),
        PrincipalKind::DealerUser { dealer_id: None } => nothing(),
    }
}

/// Base visibility for the dealer collection.
pub fn dealer_scope(principal: &Principal) -> Condition {
    created_rows_scope(principal, dealer::Column::CreatedBy)
}

/// Visibility for single-dealer reads: the listing scope, widened so a
/// dealer-class principal can always read its own linked profile.
pub fn dealer_detail_scope(principal: &Principal) -> Condition {
    match principal.kind {
        PrincipalKind::DealerUser {
            dealer_id: Some(dealer_id),
        } => Condition::any()
            .add(dealer::Column::CreatedBy.eq(principal.id))
            .add(dealer::Column::Id.eq(dealer_id)),
        _ => dealer_scope(principal),
    }
}
