use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accounts::domain::{Contact, ContactUpdate};
use crate::choices::choice_enum;
use crate::store::{ComplexId, ComplexImageId, DocumentId, NewsId, UserId};

choice_enum!(ComplexStatus {
    Apartments => "Квартиры",
    Offices => "Офисы",
    Commercial => "Торговые помещения",
});

choice_enum!(HouseType {
    MultiFamily => "Многоквартирный",
    Club => "Клубный",
});

choice_enum!(HouseClass {
    Elite => "Элитный",
    Average => "Средний",
    Budget => "Бюджет",
});

choice_enum!(BuildTechnology {
    Monolith => "Монолитный каркас с керамзитно-блочным заполнением",
    Frame => "Каркасно-панельное",
    MonolithPanel => "Монолитно-панельное",
});

choice_enum!(Territory {
    ClosedGuarded => "Закрытая охраняемая",
    Closed => "Закрытая",
    Open => "Открытая",
});

choice_enum!(CommunalPayments {
    Payment => "Платежи",
    Prepayment => "Предоплата",
});

choice_enum!(Heating {
    Central => "Центральное",
    Autonomous => "Автономное",
    Alternative => "Альтернативное",
});

choice_enum!(Sewerage {
    Central => "Центральная",
    Alternative => "Альтернативная",
});

choice_enum!(WaterService {
    Central => "Центральное",
    Alternative => "Альтернативное",
});

choice_enum!(
    /// Interior state of a unit; shared by announcements and saved filters.
    Decoration {
        RoughFinish => "Черновая отделка",
        ResidentialCondition => "Жилое состояние",
        DeveloperRenovation => "Ремонт от застройщика",
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentialComplex {
    pub id: ComplexId,
    pub developer: UserId,
    #[serde(flatten)]
    pub details: ComplexDetails,
    pub commissioning_date: NaiveDate,
}

/// Developer-editable scalar fields of a complex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexDetails {
    pub name: String,
    pub description: String,
    pub is_commissioning: bool,
    pub address: String,
    pub map_lat: f64,
    pub map_lon: f64,
    pub distance: u32,
    pub ceiling_height: f32,
    pub gas: bool,
    pub status: ComplexStatus,
    pub type_house: HouseType,
    pub class_house: HouseClass,
    pub technology: BuildTechnology,
    pub territory: Territory,
    pub communal_payments: CommunalPayments,
    pub heating: Heating,
    pub sewerage: Sewerage,
    pub water_service: WaterService,
}

impl ComplexDetails {
    /// Placeholder values a developer account starts with.
    pub fn placeholder() -> Self {
        Self {
            name: "Название".to_string(),
            description: "Описание".to_string(),
            is_commissioning: true,
            address: "Адрес".to_string(),
            map_lat: 46.502_184_459_840_62,
            map_lon: 30.738_351_206_725_632,
            distance: 0,
            ceiling_height: 2.5,
            gas: true,
            status: ComplexStatus::Apartments,
            type_house: HouseType::MultiFamily,
            class_house: HouseClass::Average,
            technology: BuildTechnology::Monolith,
            territory: Territory::Open,
            communal_payments: CommunalPayments::Payment,
            heating: Heating::Central,
            sewerage: Sewerage::Central,
            water_service: WaterService::Central,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefits {
    pub playground: bool,
    pub sportsground: bool,
    pub parking: bool,
    pub territory_protected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAndPayment {
    pub formalization: String,
    pub payment_options: String,
    pub purpose: String,
    pub contract_sum: String,
}

impl Default for RegistrationAndPayment {
    fn default() -> Self {
        Self {
            formalization: "Юстиция".to_string(),
            payment_options: "Ипотека".to_string(),
            purpose: "Жилое помещение".to_string(),
            contract_sum: "Неполная".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexImage {
    pub id: ComplexImageId,
    pub residential_complex: ComplexId,
    pub image: String,
    pub order: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub id: NewsId,
    pub residential_complex: ComplexId,
    pub title: String,
    pub text: String,
    pub date_created: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDraft {
    pub residential_complex: ComplexId,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub residential_complex: ComplexId,
    pub name: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDraft {
    pub residential_complex: ComplexId,
    pub name: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewImage {
    pub image: String,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOrder {
    pub id: ComplexImageId,
    pub order: u32,
}

/// Full developer update of a complex, including its one-to-one dependents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexUpdate {
    #[serde(flatten)]
    pub details: ComplexDetails,
    pub benefits: Benefits,
    pub registration_and_payment: RegistrationAndPayment,
    pub sales_department_contact: ContactUpdate,
    #[serde(default)]
    pub images: Vec<NewImage>,
    #[serde(default)]
    pub images_delete: Vec<ComplexImageId>,
    #[serde(default)]
    pub images_order: Vec<ImageOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexSummary {
    pub id: ComplexId,
    pub name: String,
    pub address: String,
    pub gallery: Vec<ComplexImage>,
}

/// Aggregate view returned by retrieve endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexView {
    #[serde(flatten)]
    pub complex: ResidentialComplex,
    pub status_label: &'static str,
    pub benefits: Benefits,
    pub registration_and_payment: RegistrationAndPayment,
    pub sales_department_contact: Option<Contact>,
    pub gallery: Vec<ComplexImage>,
    pub news: Vec<News>,
    pub documents: Vec<Document>,
}
