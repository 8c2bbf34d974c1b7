use std::sync::Arc;

use crate::accounts::domain::ContactUpdate;
use crate::housing::domain::{
    Benefits, ComplexDetails, ComplexUpdate, NewImage, RegistrationAndPayment,
};
use crate::housing::HousingService;
use crate::store::TableStore;
use crate::test_support::World;

pub(super) fn service(world: &World) -> Arc<HousingService<TableStore>> {
    Arc::new(HousingService::new(Arc::clone(&world.store)))
}

pub(super) fn complex_update(images: &[(&str, Option<u32>)]) -> ComplexUpdate {
    let mut details = ComplexDetails::placeholder();
    details.name = "Arcadia Towers".to_string();
    details.address = "Genuezka 5".to_string();
    ComplexUpdate {
        details,
        benefits: Benefits {
            playground: true,
            parking: true,
            ..Benefits::default()
        },
        registration_and_payment: RegistrationAndPayment::default(),
        sales_department_contact: ContactUpdate {
            first_name: Some("Taras".to_string()),
            last_name: Some("Melnyk".to_string()),
            phone: Some("+380671234567".to_string()),
            email: None,
        },
        images: images
            .iter()
            .map(|(image, order)| NewImage {
                image: image.to_string(),
                order: *order,
            })
            .collect(),
        images_delete: Vec::new(),
        images_order: Vec::new(),
    }
}
