//! User ids, usernames and salted password hashes.

use std::collections::HashSet;

use coursegen_core::{Role, User, UserId};
use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_BYTES: usize = 16;

/// Monotonic source of `UserId`s for a single run.
#[derive(Debug, Clone, Default)]
pub struct UserIdAllocator {
    next: UserId,
}

impl UserIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> UserId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`UserIdAllocator::next_id`] will return.
    pub fn peek(&self) -> UserId {
        self.next
    }
}

/// Random 16-byte salt, hex encoded.
pub fn generate_salt(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0_u8; SALT_BYTES];
    rng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 over `password || salt`, hex encoded.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Every `User` created during a run, with username collision tracking.
#[derive(Debug, Clone, Default)]
pub struct UserPool {
    users: Vec<User>,
    usernames: HashSet<String>,
    ids: UserIdAllocator,
}

impl UserPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// `first.last` in lowercase, suffixed with 1, 2, ... until unused.
    pub fn unique_username(&self, first_name: &str, last_name: &str) -> String {
        let base = format!(
            "{}.{}",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        );
        self.resolve_collision(base)
    }

    /// Register a person's account and return its id.
    pub fn register_person(
        &mut self,
        first_name: &str,
        last_name: &str,
        role: Role,
        password: &str,
        rng: &mut dyn RngCore,
    ) -> UserId {
        let username = self.unique_username(first_name, last_name);
        self.insert(username, role, password, rng)
    }

    /// Register an account under a fixed username, suffixed on collision.
    pub fn register_named(
        &mut self,
        username: &str,
        role: Role,
        password: &str,
        rng: &mut dyn RngCore,
    ) -> UserId {
        let username = self.resolve_collision(username.to_string());
        self.insert(username, role, password, rng)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.user_id == user_id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn into_users(self) -> Vec<User> {
        self.users
    }

    fn resolve_collision(&self, base: String) -> String {
        if !self.usernames.contains(&base) {
            return base;
        }
        let mut suffix = 1_u32;
        loop {
            let candidate = format!("{base}{suffix}");
            if !self.usernames.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn insert(
        &mut self,
        username: String,
        role: Role,
        password: &str,
        rng: &mut dyn RngCore,
    ) -> UserId {
        let salt = generate_salt(rng);
        let password = hash_password(password, &salt);
        let user_id = self.ids.next_id();
        self.usernames.insert(username.clone());
        self.users.push(User {
            user_id,
            username,
            password,
            role,
            salt,
        });
        user_id
    }
}
