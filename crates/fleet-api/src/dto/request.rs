//! Request DTOs with validation.
//!
//! Bodies accept both PascalCase (`Nome`) and camelCase (`nome`) keys.
//! Missing fields deserialize to their defaults so that absence is
//! reported as a validation message rather than a parse failure.

use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use fleet_auth::password::PasswordPolicy;
use fleet_entity::{NewVehicle, Role};

const EMAIL_MAX_LENGTH: usize = 255;

/// Login request body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(alias = "Email")]
    #[validate(length(min = 1, message = "O email é obrigatório"))]
    pub email: String,
    #[serde(alias = "Senha")]
    #[validate(length(min = 1, message = "A senha é obrigatória"))]
    pub senha: String,
}

impl LoginRequest {
    /// Validation messages, empty when the request is acceptable.
    pub fn violations(&mut self) -> Vec<String> {
        self.email = self.email.trim().to_string();
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => messages(&errors, &["email", "senha"]),
        }
    }
}

/// Vehicle create/update body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct VehicleRequest {
    #[serde(alias = "Nome")]
    #[validate(
        custom(function = "required", message = "O nome não pode ser vazio"),
        length(max = 150, message = "O nome não pode ter mais que 150 caracteres")
    )]
    pub nome: String,
    #[serde(alias = "Marca")]
    #[validate(
        custom(function = "required", message = "A Marca não pode ficar em branco"),
        length(max = 100, message = "A marca não pode ter mais que 100 caracteres")
    )]
    pub marca: String,
    #[serde(alias = "Ano")]
    #[validate(range(
        min = 1950,
        message = "Veículo muito antigo, aceito somete anos superiores a 1950"
    ))]
    pub ano: i32,
}

impl VehicleRequest {
    /// Trim, validate and convert into a draft.
    pub fn into_draft(mut self) -> Result<NewVehicle, Vec<String>> {
        self.nome = self.nome.trim().to_string();
        self.marca = self.marca.trim().to_string();
        if let Err(errors) = self.validate() {
            return Err(messages(&errors, &["nome", "marca", "ano"]));
        }
        Ok(NewVehicle {
            name: self.nome,
            brand: self.marca,
            year: self.ano,
        })
    }
}

/// Role as sent by clients: a name (`"Adm"`, `"Editor"`) or its ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoleInput {
    Name(String),
    Ordinal(i64),
}

impl RoleInput {
    /// The role this input names, if any.
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Name(name) => name.parse().ok(),
            Self::Ordinal(0) => Some(Role::Admin),
            Self::Ordinal(1) => Some(Role::Editor),
            Self::Ordinal(_) => None,
        }
    }
}

/// Administrator creation body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdministratorRequest {
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Senha")]
    pub senha: String,
    #[serde(alias = "Perfil")]
    pub perfil: Option<RoleInput>,
}

/// Fields of an accepted [`AdministratorRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAdministrator {
    pub email: String,
    pub senha: String,
    pub perfil: Role,
}

impl AdministratorRequest {
    /// Validate every field, collecting all messages.
    pub fn validated(self, policy: &PasswordPolicy) -> Result<ValidAdministrator, Vec<String>> {
        let mut messages = Vec::new();

        let email = self.email.trim().to_string();
        if email.is_empty() {
            messages.push("O email é obrigatório".to_string());
        } else {
            if !email.validate_email() {
                messages.push("Email deve ter um formato válido".to_string());
            }
            if email.chars().count() > EMAIL_MAX_LENGTH {
                messages.push("Email não pode ter mais que 255 caracteres".to_string());
            }
        }

        messages.extend(policy.violations(&self.senha));

        let perfil = match &self.perfil {
            None => {
                messages.push("O perfil é obrigatório".to_string());
                None
            }
            Some(input) => {
                let role = input.role();
                if role.is_none() {
                    messages.push("Perfil deve ser Adm ou Editor".to_string());
                }
                role
            }
        };

        match perfil {
            Some(perfil) if messages.is_empty() => Ok(ValidAdministrator {
                email,
                senha: self.senha,
                perfil,
            }),
            _ => Err(messages),
        }
    }
}

/// `?pagina=n` on administrator listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(alias = "Pagina")]
    pub pagina: Option<u64>,
}

/// Query string of the vehicle listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleListQuery {
    #[serde(alias = "Pagina")]
    pub pagina: Option<u64>,
    #[serde(alias = "Nome")]
    pub nome: Option<String>,
    #[serde(alias = "Marca")]
    pub marca: Option<String>,
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

/// Flatten validator errors into messages, ordered by `fields`.
fn messages(errors: &ValidationErrors, fields: &[&str]) -> Vec<String> {
    let mut by_field: Vec<_> = errors.field_errors().into_iter().collect();
    by_field.sort_by_key(|(field, _)| {
        let field: &str = field;
        fields.iter().position(|f| *f == field).unwrap_or(fields.len())
    });

    by_field
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .map(|err| match &err.message {
            Some(message) => message.to_string(),
            None => err.code.to_string(),
        })
        .collect()
}
