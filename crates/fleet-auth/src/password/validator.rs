//! Password policy for new administrator credentials.

/// Length and character-class rules applied when an administrator is created.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 50,
        }
    }
}

impl PasswordPolicy {
    /// Policy with custom length bounds; the character-class rule always applies.
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    /// Messages for every rule the password breaks, empty when it complies.
    pub fn violations(&self, password: &str) -> Vec<String> {
        if password.is_empty() {
            return vec!["A senha é obrigatória".to_string()];
        }

        let mut messages = Vec::new();
        let length = password.chars().count();
        if length < self.min_length {
            messages.push(format!(
                "A senha deve ter pelo menos {} caracteres",
                self.min_length
            ));
        }
        if length > self.max_length {
            messages.push(format!(
                "A senha não pode ter mais que {} caracteres",
                self.max_length
            ));
        }

        let has_lower = password.chars().any(|c| c.is_lowercase());
        let has_upper = password.chars().any(|c| c.is_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(has_lower && has_upper && has_digit) {
            messages.push(
                "A senha deve conter pelo menos uma letra minúscula, uma maiúscula e um número"
                    .to_string(),
            );
        }
        messages
    }
}
