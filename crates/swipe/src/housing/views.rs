use crate::store::Tables;

use super::domain::{ComplexSummary, ComplexView, ResidentialComplex};

pub fn summary(tables: &Tables, complex: &ResidentialComplex) -> ComplexSummary {
    ComplexSummary {
        id: complex.id,
        name: complex.details.name.clone(),
        address: complex.details.address.clone(),
        gallery: tables.complex_gallery(complex.id),
    }
}

pub fn detail(tables: &Tables, complex: &ResidentialComplex) -> ComplexView {
    ComplexView {
        complex: complex.clone(),
        status_label: complex.details.status.label(),
        benefits: tables.benefits.get(&complex.id).cloned().unwrap_or_default(),
        registration_and_payment: tables
            .registrations
            .get(&complex.id)
            .cloned()
            .unwrap_or_default(),
        sales_department_contact: tables.sales_contact_of(complex.id).cloned(),
        gallery: tables.complex_gallery(complex.id),
        news: tables
            .news
            .values()
            .filter(|news| news.residential_complex == complex.id)
            .cloned()
            .collect(),
        documents: tables
            .documents
            .values()
            .filter(|document| document.residential_complex == complex.id)
            .cloned()
            .collect(),
    }
}
