//! Administrator login, listing and creation.

use tracing::{info, warn};

use fleet_auth::jwt::{IssuedToken, JwtEncoder};
use fleet_auth::password::PasswordHasher;
use fleet_cache::{CacheService, keys};
use fleet_core::config::SeedAdministratorConfig;
use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_core::types::pagination::DEFAULT_PAGE_SIZE;
use fleet_core::types::{FilterField, PageRequest};
use fleet_database::DatabaseManager;
use fleet_entity::{Administrator, NewAdministrator, Role};

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated account.
    pub administrator: Administrator,
    /// Signed access token.
    pub token: IssuedToken,
}

/// Validated input for a new administrator.
#[derive(Debug, Clone)]
pub struct NewAdministratorInput {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Permission tier.
    pub role: Role,
}

/// Administrator use cases.
#[derive(Debug, Clone)]
pub struct AdministratorService {
    db: DatabaseManager,
    cache: CacheService,
    hasher: PasswordHasher,
    encoder: JwtEncoder,
}

impl AdministratorService {
    /// Creates a new administrator service.
    pub fn new(db: DatabaseManager, cache: CacheService, encoder: JwtEncoder) -> Self {
        Self {
            db,
            cache,
            hasher: PasswordHasher::new(),
            encoder,
        }
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let email = normalize_email(email);
        let administrator = self.find_by_email(&email).await?;

        let Some(administrator) = administrator else {
            info!(email = %email, "Login rejected: unknown email");
            return Err(invalid_credentials());
        };

        if !self
            .hasher
            .verify_password(password, &administrator.password_hash)?
        {
            info!(administrator_id = administrator.id, "Login rejected: wrong password");
            return Err(invalid_credentials());
        }

        let token = self.encoder.issue(&administrator)?;
        info!(administrator_id = administrator.id, role = %administrator.role, "Administrator logged in");
        Ok(LoginOutcome {
            administrator,
            token,
        })
    }

    /// All administrators, or one page of them when `page` is given.
    pub async fn list(&self, page: Option<u64>) -> AppResult<Vec<Administrator>> {
        let Some(page) = page else {
            return self.db.administrators().find_all().await;
        };

        let key = keys::administrators_page(page);
        if let Some(cached) = self.cache.get::<Vec<Administrator>>(&key).await {
            return Ok(cached);
        }

        let items = self
            .db
            .administrators()
            .find_page(&PageRequest::new(page, DEFAULT_PAGE_SIZE))
            .await?
            .items;
        self.cache.set(&key, &items, None).await;
        Ok(items)
    }

    /// Look up one administrator.
    pub async fn get(&self, id: i64) -> AppResult<Option<Administrator>> {
        let key = keys::administrator_by_id(id);
        if let Some(cached) = self.cache.get::<Administrator>(&key).await {
            return Ok(Some(cached));
        }

        let found = self.db.administrators().find_by_id(id).await?;
        if let Some(administrator) = &found {
            self.cache.set(&key, administrator, None).await;
        }
        Ok(found)
    }

    /// Hash the password and store a new administrator in one transaction.
    pub async fn create(&self, input: NewAdministratorInput) -> AppResult<Administrator> {
        let draft = NewAdministrator {
            email: normalize_email(&input.email),
            password_hash: self.hasher.hash_password(&input.password)?,
            role: input.role,
        };

        let uow = self.db.unit_of_work();
        uow.begin().await?;
        let written = async {
            let created = uow.administrators().add(&draft).await?;
            uow.save_changes().await?;
            Ok::<_, AppError>(created)
        }
        .await;

        let created = match written {
            Ok(created) => created,
            Err(e) => {
                if let Err(rollback) = uow.rollback().await {
                    warn!(error = %rollback, "Rollback after failed administrator insert failed");
                }
                return Err(e);
            }
        };
        uow.commit().await?;

        self.cache
            .remove_by_pattern(keys::administrators_pages_pattern())
            .await;
        self.cache.remove(keys::statistics()).await;

        info!(administrator_id = created.id, role = %created.role, "Administrator created");
        Ok(created)
    }

    /// Create the configured bootstrap administrator when the table is empty.
    ///
    /// Returns whether an account was created.
    pub async fn seed(&self, seed: &SeedAdministratorConfig) -> AppResult<bool> {
        if self.db.administrators().count().await? > 0 {
            return Ok(false);
        }

        let role: Role = seed.role.parse()?;
        self.create(NewAdministratorInput {
            email: seed.email.clone(),
            password: seed.password.clone(),
            role,
        })
        .await?;
        warn!(email = %seed.email, "Seed administrator created; change its password");
        Ok(true)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Administrator>> {
        let mut found = self
            .db
            .administrators()
            .find(&[FilterField::eq("email", email)])
            .await?;
        Ok(found.pop())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::authentication("Invalid email or password")
}
