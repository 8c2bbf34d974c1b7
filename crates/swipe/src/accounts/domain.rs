use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::housing::domain::Decoration;
use crate::listings::domain::{PaymentOptions, Purpose};
use crate::store::{ComplexId, ContactId, FilterId, MessageId, NotaryId, SubscriptionId, UserId};

/// Who receives call and message notifications for a user's listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTarget {
    #[default]
    #[serde(alias = "Мне")]
    Me,
    #[serde(alias = "Мне и агенту")]
    MeAndAgent,
    #[serde(alias = "Агенту")]
    Agent,
    #[serde(alias = "Отключить")]
    Disabled,
}

impl NotificationTarget {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Me => "Мне",
            Self::MeAndAgent => "Мне и агенту",
            Self::Agent => "Агенту",
            Self::Disabled => "Отключить",
        }
    }
}

/// Coarse role derived from the user flags. Staff outranks everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    Developer,
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub is_staff: bool,
    pub is_developer: bool,
    pub is_active: bool,
    pub per_agent: bool,
    pub is_blacklist: bool,
    pub notification: NotificationTarget,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        if self.is_staff {
            Role::Staff
        } else if self.is_developer {
            Role::Developer
        } else {
            Role::Member
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    #[serde(alias = "Отдел продаж")]
    SalesDepartment,
    #[serde(alias = "Контакты агента")]
    AgentContacts,
}

impl ContactKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SalesDepartment => "Отдел продаж",
            Self::AgentContacts => "Контакты агента",
        }
    }
}

/// Sales-department contact of a complex or the agent contact of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub kind: ContactKind,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub residential_complex: Option<ComplexId>,
    pub user: Option<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Contact {
    pub fn apply(&mut self, update: ContactUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user: UserId,
    pub date_start: NaiveDate,
    pub date_end: Option<NaiveDate>,
    pub is_active: bool,
    pub is_auto_renewal: bool,
}

impl Subscription {
    pub fn expired_before(&self, today: NaiveDate) -> bool {
        self.date_end.is_some_and(|end| end < today)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notary {
    pub id: NotaryId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotaryDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: UserId,
    pub recipient: Option<UserId>,
    pub text: String,
    pub is_feedback: bool,
    pub files: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub text: String,
    #[serde(default)]
    pub recipient: Option<UserId>,
    #[serde(default)]
    pub is_feedback: bool,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Saved search criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFilter {
    pub id: FilterId,
    pub user: UserId,
    #[serde(flatten)]
    pub criteria: FilterCriteria,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default = "default_true")]
    pub status_house: bool,
    pub district: String,
    pub microdistrict: String,
    pub rooms: u8,
    pub price_start: u64,
    pub price_end: u64,
    pub area_start: u32,
    pub area_end: u32,
    pub type_housing: String,
    #[serde(default = "default_purpose")]
    pub purpose: Purpose,
    #[serde(default = "default_payment_options")]
    pub payment_options: PaymentOptions,
    #[serde(default = "default_state")]
    pub state: Decoration,
}

fn default_true() -> bool {
    true
}

fn default_purpose() -> Purpose {
    Purpose::Flat
}

fn default_payment_options() -> PaymentOptions {
    PaymentOptions::Other
}

fn default_state() -> Decoration {
    Decoration::RoughFinish
}

/// Self-service profile changes. Absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_developer: bool,
}

/// Public projection of a user for profile and admin listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub role: Role,
    pub notification: NotificationTarget,
    pub notification_label: &'static str,
    pub per_agent: bool,
    pub is_blacklist: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            profile_image: user.profile_image.clone(),
            role: user.role(),
            notification: user.notification,
            notification_label: user.notification.label(),
            per_agent: user.per_agent,
            is_blacklist: user.is_blacklist,
        }
    }
}
