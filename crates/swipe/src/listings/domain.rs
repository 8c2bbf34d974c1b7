use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::choices::choice_enum;
use crate::housing::domain::{Decoration, Heating};
use crate::store::{
    AdvertisingId, AnnouncementId, AnnouncementImageId, ApartmentId, ComplaintId, ComplexId,
    UserId,
};

choice_enum!(FoundingDocument {
    Ownership => "Собственность",
    Inheritance => "Свидетельство о праве на наследство",
});

choice_enum!(
    /// What the property is for. Only flats live inside a residential complex.
    Purpose {
        Apartments => "Апартаменты",
        Flat => "Квартира",
        Commercial => "Коммерческие помещения",
        Office => "Офисное помещение",
    }
);

choice_enum!(Layout {
    Studio => "Студия, санузел",
    Classic => "Классическая",
    Euro => "Европланировка",
    Free => "Свободная",
});

choice_enum!(PaymentOptions {
    Mortgage => "Ипотека",
    MaternityCapital => "Мат.капитал",
    Other => "Другое",
});

choice_enum!(AgentCommission {
    Small => "10 000 ₴",
    Medium => "15 000 ₴",
    Big => "30 000 ₴",
});

impl AgentCommission {
    pub const fn amount(self) -> u32 {
        match self {
            Self::Small => 10_000,
            Self::Medium => 15_000,
            Self::Big => 30_000,
        }
    }
}

choice_enum!(Communication {
    CallAndMessage => "Звонок + сообщение",
    Call => "Звонок",
    Message => "Сообщение",
});

choice_enum!(AdvertisingPhrase {
    Gift => "Подарок при покупке",
    Bargain => "Возможен торг",
    SeaView => "Квартира у моря",
    SleepingDistrict => "В спальном районе",
    LuckyPrice => "Вам повезло с ценой!",
    BigFamily => "Для большой семьи",
    FamilyNest => "Семейное гнездышко",
    Parking => "Отдельная парковка",
});

choice_enum!(AdvertisingColor {
    Pink => "FDD7D7",
    Green => "CEF2D2",
});

pub fn rooms_label(rooms: u8) -> String {
    format!("{rooms} комнатная")
}

/// Listing attributes a creator may edit after publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementDetails {
    pub address: String,
    pub description: String,
    pub area: f64,
    pub area_kitchen: f64,
    #[serde(default = "default_true")]
    pub balcony_or_loggia: bool,
    pub price: u64,
    #[serde(default = "default_founding_document")]
    pub founding_document: FoundingDocument,
    #[serde(default = "default_rooms")]
    pub rooms: u8,
    #[serde(default = "default_layout")]
    pub layout: Layout,
    #[serde(default = "default_condition")]
    pub condition: Decoration,
    #[serde(default = "default_heating")]
    pub heating: Heating,
    #[serde(default = "default_payment_options")]
    pub payment_options: PaymentOptions,
    #[serde(default = "default_agent_commission")]
    pub agent_commission: AgentCommission,
    #[serde(default = "default_communication")]
    pub communication: Communication,
}

fn default_true() -> bool {
    true
}

fn default_founding_document() -> FoundingDocument {
    FoundingDocument::Ownership
}

fn default_rooms() -> u8 {
    1
}

fn default_layout() -> Layout {
    Layout::Classic
}

fn default_condition() -> Decoration {
    Decoration::ResidentialCondition
}

fn default_heating() -> Heating {
    Heating::Central
}

fn default_payment_options() -> PaymentOptions {
    PaymentOptions::Other
}

fn default_agent_commission() -> AgentCommission {
    AgentCommission::Small
}

fn default_communication() -> Communication {
    Communication::CallAndMessage
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub creator: UserId,
    pub purpose: Purpose,
    pub residential_complex: Option<ComplexId>,
    #[serde(flatten)]
    pub details: AnnouncementDetails,
    pub date_created: DateTime<Utc>,
    pub is_active: bool,
    pub is_moderation_check: bool,
    pub count_view: u64,
}

impl Announcement {
    pub fn is_flat(&self) -> bool {
        self.purpose == Purpose::Flat
    }

    /// Visible in public queries.
    pub fn is_published(&self) -> bool {
        self.is_moderation_check && self.is_active
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementDraft {
    pub purpose: Purpose,
    #[serde(default)]
    pub residential_complex: Option<ComplexId>,
    #[serde(flatten)]
    pub details: AnnouncementDetails,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Creator edit. Purpose and residential complex are fixed after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementUpdate {
    #[serde(flatten)]
    pub details: AnnouncementDetails,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub images_delete: Vec<AnnouncementImageId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementImage {
    pub id: AnnouncementImageId,
    pub announcement: AnnouncementId,
    pub image: String,
}

/// Visual boosts bought with an advertising slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionOptions {
    #[serde(default)]
    pub add_phrase: bool,
    #[serde(default)]
    pub add_color: bool,
    #[serde(default)]
    pub is_big: bool,
    #[serde(default)]
    pub is_raise: bool,
    #[serde(default)]
    pub is_turbo: bool,
    #[serde(default)]
    pub phrase: Option<AdvertisingPhrase>,
    #[serde(default)]
    pub color: Option<AdvertisingColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertising {
    pub id: AdvertisingId,
    pub announcement: AnnouncementId,
    #[serde(flatten)]
    pub options: PromotionOptions,
    pub is_active: bool,
    pub date_start: NaiveDate,
    pub date_end: Option<NaiveDate>,
}

impl Advertising {
    pub fn expired_before(&self, today: NaiveDate) -> bool {
        self.date_end.is_some_and(|end| end < today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apartment {
    pub id: ApartmentId,
    pub announcement: AnnouncementId,
    pub number: u64,
    pub floor: Option<u16>,
    pub corpus: Option<u16>,
    pub section: Option<u16>,
    pub is_booked: bool,
    pub price_to_meter: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApartmentUpdate {
    pub number: Option<u64>,
    pub floor: Option<u16>,
    pub corpus: Option<u16>,
    pub section: Option<u16>,
    pub is_booked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: ComplaintId,
    pub announcement: AnnouncementId,
    pub creator: UserId,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintDraft {
    pub announcement: AnnouncementId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationDecision {
    pub is_moderation_check: bool,
}

/// Feed card: the fields shown in list views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnouncementCard {
    pub id: AnnouncementId,
    pub date_created: DateTime<Utc>,
    pub address: String,
    pub area: f64,
    pub price: u64,
    pub is_moderation_check: bool,
    pub is_active: bool,
    pub purpose: Purpose,
    pub purpose_label: &'static str,
    pub rooms: u8,
    pub rooms_label: String,
    pub gallery: Vec<AnnouncementImage>,
    pub advertising: Option<Advertising>,
}

/// Detail view with every derived record attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnouncementView {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub purpose_label: &'static str,
    pub condition_label: &'static str,
    pub gallery: Vec<AnnouncementImage>,
    pub advertising: Option<Advertising>,
    pub apartment: Option<Apartment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApartmentView {
    #[serde(flatten)]
    pub apartment: Apartment,
    pub announcement: AnnouncementCard,
}
