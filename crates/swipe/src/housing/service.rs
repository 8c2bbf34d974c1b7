use std::sync::Arc;

use chrono::NaiveDate;

use crate::access::{self, Caller};
use crate::accounts::domain::{Contact, ContactKind};
use crate::error::ServiceError;
use crate::store::{ComplexId, ComplexImageId, ContactId, DocumentId, EntityStore, NewsId, Tables};

use super::domain::{
    ComplexImage, ComplexSummary, ComplexUpdate, ComplexView, Document, DocumentDraft, News,
    NewsDraft, ResidentialComplex,
};
use super::{validation, views};

/// Residential complexes and the content hanging off them.
pub struct HousingService<S> {
    store: Arc<S>,
}

fn find_complex(tables: &Tables, id: ComplexId) -> Result<&ResidentialComplex, ServiceError> {
    tables
        .complexes
        .get(&id)
        .ok_or(ServiceError::NotFound("residential complex"))
}

/// Staff may target any complex; a developer only their own.
fn check_target_complex(
    tables: &Tables,
    caller: Caller,
    complex: ComplexId,
) -> Result<(), ServiceError> {
    let user = access::actor(tables, caller)?;
    access::ensure(user.is_staff || user.is_developer)?;
    if !tables.complexes.contains_key(&complex) {
        return Err(ServiceError::invalid(
            "residential_complex",
            format!("Нет ЖК с id {complex}"),
        ));
    }
    access::ensure(access::owns_complex_object(tables, user, complex))
}

impl<S> HousingService<S>
where
    S: EntityStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn list(&self, caller: Caller) -> Result<Vec<ComplexSummary>, ServiceError> {
        self.store.read(|tables| {
            access::actor(tables, caller)?;
            Ok(tables
                .complexes
                .values()
                .map(|complex| views::summary(tables, complex))
                .collect())
        })?
    }

    pub fn retrieve(&self, caller: Caller, id: ComplexId) -> Result<ComplexView, ServiceError> {
        self.store.read(|tables| {
            access::actor(tables, caller)?;
            Ok(views::detail(tables, find_complex(tables, id)?))
        })?
    }

    /// The complex of the calling developer.
    pub fn mine(&self, caller: Caller) -> Result<ComplexView, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?;
            let complex = tables
                .complex_of(user.id)
                .filter(|_| user.is_developer)
                .ok_or(ServiceError::NotFound("residential complex"))?;
            Ok(views::detail(tables, complex))
        })?
    }

    pub fn update(
        &self,
        caller: Caller,
        id: ComplexId,
        update: ComplexUpdate,
    ) -> Result<ComplexView, ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            let current = find_complex(tables, id)?;
            access::ensure(access::owns_complex(user, current))?;
            validation::validate_details(&update.details).into_result()?;

            let mut complex = current.clone();
            complex.details = update.details;
            tables.complexes.insert(id, complex.clone());
            tables.benefits.insert(id, update.benefits);
            tables
                .registrations
                .insert(id, update.registration_and_payment);

            let existing = tables.sales_contact_of(id).cloned();
            let mut contact = match existing {
                Some(contact) => contact,
                None => Contact {
                    id: ContactId(tables.allocate()),
                    kind: ContactKind::SalesDepartment,
                    first_name: String::new(),
                    last_name: String::new(),
                    phone: None,
                    email: None,
                    residential_complex: Some(id),
                    user: None,
                },
            };
            contact.apply(update.sales_department_contact);
            tables.contacts.insert(contact.id, contact);

            for image in update.images_delete {
                if tables
                    .complex_images
                    .get(&image)
                    .is_some_and(|row| row.residential_complex == id)
                {
                    tables.complex_images.remove(&image);
                }
            }
            for entry in update.images_order {
                if let Some(row) = tables
                    .complex_images
                    .get_mut(&entry.id)
                    .filter(|row| row.residential_complex == id)
                {
                    row.order = Some(entry.order);
                }
            }
            for image in update.images {
                let image_id = ComplexImageId(tables.allocate());
                tables.complex_images.insert(
                    image_id,
                    ComplexImage {
                        id: image_id,
                        residential_complex: id,
                        image: image.image,
                        order: image.order,
                    },
                );
            }

            tracing::info!(complex = %id, "residential complex updated");
            Ok(views::detail(tables, &complex))
        })
    }

    pub fn delete(&self, caller: Caller, id: ComplexId) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            access::require_staff(access::actor(tables, caller)?)?;
            tables
                .remove_complex(id)
                .ok_or(ServiceError::NotFound("residential complex"))?;
            tracing::info!(complex = %id, "residential complex deleted");
            Ok(())
        })
    }

    pub fn create_news(
        &self,
        caller: Caller,
        draft: NewsDraft,
        today: NaiveDate,
    ) -> Result<News, ServiceError> {
        self.store.write(|tables| {
            check_target_complex(tables, caller, draft.residential_complex)?;
            validation::validate_news(&draft).into_result()?;
            let id = NewsId(tables.allocate());
            let news = News {
                id,
                residential_complex: draft.residential_complex,
                title: draft.title,
                text: draft.text,
                date_created: today,
            };
            tables.news.insert(id, news.clone());
            Ok(news)
        })
    }

    pub fn news(&self, caller: Caller, id: NewsId) -> Result<News, ServiceError> {
        self.store.read(|tables| {
            access::actor(tables, caller)?;
            tables
                .news
                .get(&id)
                .cloned()
                .ok_or(ServiceError::NotFound("news"))
        })?
    }

    pub fn update_news(
        &self,
        caller: Caller,
        id: NewsId,
        draft: NewsDraft,
    ) -> Result<News, ServiceError> {
        self.store.write(|tables| {
            let current = tables
                .news
                .get(&id)
                .cloned()
                .ok_or(ServiceError::NotFound("news"))?;
            check_target_complex(tables, caller, current.residential_complex)?;
            check_target_complex(tables, caller, draft.residential_complex)?;
            validation::validate_news(&draft).into_result()?;

            let news = News {
                residential_complex: draft.residential_complex,
                title: draft.title,
                text: draft.text,
                ..current
            };
            tables.news.insert(id, news.clone());
            Ok(news)
        })
    }

    pub fn delete_news(&self, caller: Caller, id: NewsId) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            let complex = tables
                .news
                .get(&id)
                .map(|news| news.residential_complex)
                .ok_or(ServiceError::NotFound("news"))?;
            check_target_complex(tables, caller, complex)?;
            tables.news.remove(&id);
            Ok(())
        })
    }

    pub fn create_document(
        &self,
        caller: Caller,
        draft: DocumentDraft,
    ) -> Result<Document, ServiceError> {
        self.store.write(|tables| {
            check_target_complex(tables, caller, draft.residential_complex)?;
            validation::validate_document(&draft).into_result()?;
            let id = DocumentId(tables.allocate());
            let document = Document {
                id,
                residential_complex: draft.residential_complex,
                name: draft.name,
                file: draft.file,
            };
            tables.documents.insert(id, document.clone());
            Ok(document)
        })
    }

    pub fn document(&self, caller: Caller, id: DocumentId) -> Result<Document, ServiceError> {
        self.store.read(|tables| {
            access::actor(tables, caller)?;
            tables
                .documents
                .get(&id)
                .cloned()
                .ok_or(ServiceError::NotFound("document"))
        })?
    }

    pub fn update_document(
        &self,
        caller: Caller,
        id: DocumentId,
        draft: DocumentDraft,
    ) -> Result<Document, ServiceError> {
        self.store.write(|tables| {
            let current = tables
                .documents
                .get(&id)
                .map(|document| document.residential_complex)
                .ok_or(ServiceError::NotFound("document"))?;
            check_target_complex(tables, caller, current)?;
            check_target_complex(tables, caller, draft.residential_complex)?;
            validation::validate_document(&draft).into_result()?;

            let document = Document {
                id,
                residential_complex: draft.residential_complex,
                name: draft.name,
                file: draft.file,
            };
            tables.documents.insert(id, document.clone());
            Ok(document)
        })
    }

    pub fn delete_document(&self, caller: Caller, id: DocumentId) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            let complex = tables
                .documents
                .get(&id)
                .map(|document| document.residential_complex)
                .ok_or(ServiceError::NotFound("document"))?;
            check_target_complex(tables, caller, complex)?;
            tables.documents.remove(&id);
            Ok(())
        })
    }
}
