use chrono::NaiveDateTime;
use coursegen_core::IdentityOptions;
use rand::RngCore;
use tracing::{error, warn};

use crate::catalog::DepartmentCatalog;
use crate::identity::UserPool;
use crate::model::GenerationIssue;

/// Mutable state shared by every generator and the assignment engine.
///
/// Owns the user pool and the issues raised during a run; borrows the
/// random source so callers decide how it is seeded.
pub struct GenerationContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub users: UserPool,
    pub catalog: DepartmentCatalog,
    pub identity: IdentityOptions,
    /// Reference instant for dates drawn "in the future".
    pub base_time: NaiveDateTime,
    pub issues: Vec<GenerationIssue>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore, base_time: NaiveDateTime) -> Self {
        Self {
            rng,
            users: UserPool::new(),
            catalog: DepartmentCatalog::default(),
            identity: IdentityOptions::default(),
            base_time,
            issues: Vec::new(),
        }
    }

    pub fn with_catalog(mut self, catalog: DepartmentCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_identity(mut self, identity: IdentityOptions) -> Self {
        self.identity = identity;
        self
    }

    /// Log and keep a degraded-generation issue for the run report.
    pub fn record(&mut self, issue: GenerationIssue) {
        if issue.level == "error" {
            error!(code = %issue.code, "{}", issue.message);
        } else {
            warn!(code = %issue.code, "{}", issue.message);
        }
        self.issues.push(issue);
    }
}
