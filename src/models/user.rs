//! User model for RT (`user/<name>`).

use serde::{Deserialize, Serialize};

use crate::fields::{FieldProcessor, FieldProcessorRegistry, FieldTable};
use crate::models::{Entity, EntityKind};

/// An RT user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric user ID (`id: user/22`).
    pub id: Option<u64>,

    /// Login name.
    pub name: Option<String>,

    /// Email address.
    pub email_address: Option<String>,

    /// Full name.
    pub real_name: Option<String>,

    /// Nickname.
    pub nick_name: Option<String>,

    /// Organization.
    pub organization: Option<String>,

    /// Address line 1.
    pub address1: Option<String>,

    /// Address line 2.
    pub address2: Option<String>,

    /// City.
    pub city: Option<String>,

    /// State or region.
    pub state: Option<String>,

    /// Postal code.
    pub zip: Option<String>,

    /// Country.
    pub country: Option<String>,

    /// Home phone.
    pub home_phone: Option<String>,

    /// Work phone.
    pub work_phone: Option<String>,

    /// Mobile phone.
    pub mobile_phone: Option<String>,

    /// Pager.
    pub pager_phone: Option<String>,

    /// Free-form contact info.
    pub contact_info: Option<String>,

    /// Comments about the user.
    pub comments: Option<String>,

    /// Email signature.
    pub signature: Option<String>,

    /// Unix login (GECOS).
    pub gecos: Option<String>,

    /// Preferred language.
    pub lang: Option<String>,

    /// Whether the user may log into the RT web UI.
    pub privileged: Option<bool>,

    /// Whether the account is disabled.
    pub disabled: Option<bool>,
}

impl User {
    /// Returns the real name, falling back to login name, email or ID.
    pub fn display_name(&self) -> String {
        self.real_name
            .clone()
            .or_else(|| self.name.clone())
            .or_else(|| self.email_address.clone())
            .or_else(|| self.id.map(|id| format!("user/{}", id)))
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Returns true unless the account is explicitly disabled.
    pub fn is_enabled(&self) -> bool {
        self.disabled != Some(true)
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn field_table() -> FieldTable<Self> {
        let mut table: FieldTable<Self> = FieldTable::new();
        table
            .register("id", FieldProcessor::Identifier(|u, v| u.id = v))
            .register("Name", FieldProcessor::Text(|u, v| u.name = v))
            .register("EmailAddress", FieldProcessor::Text(|u, v| u.email_address = v))
            .register("RealName", FieldProcessor::Text(|u, v| u.real_name = v))
            .register("NickName", FieldProcessor::Text(|u, v| u.nick_name = v))
            .register("Organization", FieldProcessor::Text(|u, v| u.organization = v))
            .register("Address1", FieldProcessor::Text(|u, v| u.address1 = v))
            .register("Address2", FieldProcessor::Text(|u, v| u.address2 = v))
            .register("City", FieldProcessor::Text(|u, v| u.city = v))
            .register("State", FieldProcessor::Text(|u, v| u.state = v))
            .register("Zip", FieldProcessor::Text(|u, v| u.zip = v))
            .register("Country", FieldProcessor::Text(|u, v| u.country = v))
            .register("HomePhone", FieldProcessor::Text(|u, v| u.home_phone = v))
            .register("WorkPhone", FieldProcessor::Text(|u, v| u.work_phone = v))
            .register("MobilePhone", FieldProcessor::Text(|u, v| u.mobile_phone = v))
            .register("PagerPhone", FieldProcessor::Text(|u, v| u.pager_phone = v))
            .register("ContactInfo", FieldProcessor::Text(|u, v| u.contact_info = v))
            .register("Comments", FieldProcessor::Text(|u, v| u.comments = v))
            .register("Signature", FieldProcessor::Text(|u, v| u.signature = v))
            .register("Gecos", FieldProcessor::Text(|u, v| u.gecos = v))
            .register("Lang", FieldProcessor::Text(|u, v| u.lang = v))
            .register("Privileged", FieldProcessor::Flag(|u, v| u.privileged = v))
            .register("Disabled", FieldProcessor::Flag(|u, v| u.disabled = v));
        table
    }

    fn select_table(registry: &FieldProcessorRegistry) -> &FieldTable<Self> {
        registry.users()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = User {
            id: Some(22),
            ..User::default()
        };
        assert_eq!(user.display_name(), "user/22");

        user.email_address = Some("root@localhost".to_string());
        assert_eq!(user.display_name(), "root@localhost");

        user.name = Some("root".to_string());
        assert_eq!(user.display_name(), "root");

        user.real_name = Some("Enoch Root".to_string());
        assert_eq!(user.display_name(), "Enoch Root");
    }

    #[test]
    fn test_is_enabled() {
        let mut user = User::default();
        assert!(user.is_enabled());
        user.disabled = Some(true);
        assert!(!user.is_enabled());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut user = User::default();
        user.assign_unmapped("Password", "secret");
        assert_eq!(user, User::default());
    }
}
