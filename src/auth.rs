// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Mock authentication. Users live in memory only; the session itself is
//! what gets persisted (as an [`AuthSnapshot`]).

use std::sync::Arc;

use crate::dates::Clock;
use crate::error::AuthError;
use crate::models::{AuthSnapshot, User};
use crate::notify::{Notification, NotificationBus};

pub const DEMO_EMAIL: &str = "demo@finflow.com";
pub const DEMO_PASSWORD: &str = "demo123";
pub const DEMO_NAME: &str = "Demo User";

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// In-memory user directory seeded with the demo account.
#[derive(Debug, Clone)]
pub struct AuthService {
    accounts: Vec<Account>,
}

impl AuthService {
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            accounts: vec![Account {
                user: User {
                    id: "1".to_string(),
                    email: DEMO_EMAIL.to_string(),
                    name: DEMO_NAME.to_string(),
                    created_at: clock.now(),
                },
                password: DEMO_PASSWORD.to_string(),
            }],
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        self.accounts
            .iter()
            .find(|a| a.user.email == email && a.password == password)
            .map(|a| a.user.clone())
            .ok_or(AuthError::InvalidCredentials)
    }

    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
        clock: &dyn Clock,
    ) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if self.accounts.iter().any(|a| a.user.email == email) {
            return Err(AuthError::EmailInUse(email.to_string()));
        }
        let now = clock.now();
        let user = User {
            id: now.and_utc().timestamp_millis().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: now,
        };
        self.accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });
        Ok(user)
    }

    pub fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        if self.accounts.iter().any(|a| a.user.email == email) {
            Ok(())
        } else {
            Err(AuthError::EmailNotFound(email.to_string()))
        }
    }
}

/// The signed-in state plus the operations that change it.
pub struct AuthSession {
    state: AuthSnapshot,
    service: AuthService,
    clock: Arc<dyn Clock>,
    bus: NotificationBus,
}

impl AuthSession {
    pub fn new(state: AuthSnapshot, clock: Arc<dyn Clock>, bus: NotificationBus) -> Self {
        Self {
            state,
            service: AuthService::new(clock.as_ref()),
            clock,
            bus,
        }
    }

    pub fn snapshot(&self) -> &AuthSnapshot {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn current_user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    fn token(&self) -> String {
        format!("fake-jwt-token-{}", self.clock.now().and_utc().timestamp_millis())
    }

    fn fail<T>(&self, title: &str, err: AuthError) -> Result<T, AuthError> {
        tracing::warn!("{title}: {err}");
        self.bus.publish(Notification::error(title, err.to_string()));
        Err(err)
    }

    fn sign_in(&mut self, user: User) -> &User {
        self.state.token = Some(self.token());
        self.state.is_authenticated = true;
        self.state.user.insert(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, AuthError> {
        let user = match self.service.login(email, password) {
            Ok(user) => user,
            Err(err) => return self.fail("Sign-in failed", err),
        };
        tracing::info!(email, "signed in");
        self.bus.publish(Notification::success(
            "Signed in!",
            format!("Welcome back, {}!", user.name),
        ));
        Ok(self.sign_in(user))
    }

    pub fn register(&mut self, email: &str, password: &str, name: &str) -> Result<&User, AuthError> {
        let registered = self
            .service
            .register(email, password, name, self.clock.as_ref());
        let user = match registered {
            Ok(user) => user,
            Err(err) => return self.fail("Registration failed", err),
        };
        tracing::info!(email, "registered account");
        self.bus.publish(Notification::success(
            "Account created!",
            format!("Welcome to Finflow, {}!", user.name),
        ));
        Ok(self.sign_in(user))
    }

    pub fn logout(&mut self) {
        let farewell = match &self.state.user {
            Some(user) => format!("See you soon, {}!", user.name),
            None => "Session ended".to_string(),
        };
        self.state = AuthSnapshot::default();
        tracing::info!("signed out");
        self.bus
            .publish(Notification::info("Signed out", farewell).with_duration(3_000));
    }

    pub fn reset_password(&mut self, email: &str) -> Result<(), AuthError> {
        if let Err(err) = self.service.reset_password(email) {
            return self.fail("Password reset failed", err);
        }
        self.bus.publish(
            Notification::success("Email sent!", "Check your inbox to reset your password")
                .with_duration(4_000),
        );
        Ok(())
    }
}
