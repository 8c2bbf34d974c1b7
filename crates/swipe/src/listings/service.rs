use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::access::{self, Caller};
use crate::accounts::domain::SavedFilter;
use crate::calendar;
use crate::error::ServiceError;
use crate::housing::domain::ComplexSummary;
use crate::housing::views as housing_views;
use crate::store::{
    AdvertisingId, AnnouncementId, AnnouncementImageId, ApartmentId, ComplaintId, EntityStore,
    Tables,
};

use super::domain::{
    Advertising, Announcement, AnnouncementCard, AnnouncementDraft, AnnouncementImage,
    AnnouncementUpdate, AnnouncementView, ApartmentUpdate, ApartmentView, Complaint,
    ComplaintDraft, ModerationDecision, PromotionOptions,
};
use super::query::{ApartmentQuery, FeedQuery};
use super::{sync, validation, views};

/// Public feed payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    pub announcements: Vec<AnnouncementCard>,
    pub residential_complexes: Vec<ComplexSummary>,
    pub filters: Vec<SavedFilter>,
}

/// Announcement lifecycle: publication, moderation, promotion, complaints and the
/// apartment inventory derived from flats.
pub struct ListingService<S> {
    store: Arc<S>,
}

fn attach_images(tables: &mut Tables, announcement: AnnouncementId, images: Vec<String>) {
    for image in images {
        let id = AnnouncementImageId(tables.allocate());
        tables.announcement_images.insert(
            id,
            AnnouncementImage {
                id,
                announcement,
                image,
            },
        );
    }
}

fn find_announcement(tables: &Tables, id: AnnouncementId) -> Result<&Announcement, ServiceError> {
    tables
        .announcements
        .get(&id)
        .ok_or(ServiceError::NotFound("announcement"))
}

impl<S> ListingService<S>
where
    S: EntityStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        caller: Caller,
        draft: AnnouncementDraft,
    ) -> Result<AnnouncementView, ServiceError> {
        let today = calendar::today();
        let view = self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            access::require_not_blacklisted(user)?;
            let creator = user.id;
            validation::validate_draft(tables, &draft).into_result()?;

            let id = AnnouncementId(tables.allocate());
            let announcement = Announcement {
                id,
                creator,
                purpose: draft.purpose,
                residential_complex: draft.residential_complex,
                details: draft.details,
                date_created: Utc::now(),
                is_active: true,
                is_moderation_check: false,
                count_view: 0,
            };
            tables.announcements.insert(id, announcement.clone());
            attach_images(tables, id, draft.images);
            sync::on_created(tables, &announcement, today);

            Ok::<_, ServiceError>(views::detail(tables, &announcement))
        })?;

        tracing::info!(
            announcement = %view.announcement.id,
            creator = %view.announcement.creator,
            purpose = view.purpose_label,
            "announcement created"
        );
        Ok(view)
    }

    /// Creator edit. Only this announcement's images can be removed.
    pub fn update(
        &self,
        caller: Caller,
        id: AnnouncementId,
        update: AnnouncementUpdate,
    ) -> Result<AnnouncementView, ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            let current = find_announcement(tables, id)?;
            access::ensure(access::owns_announcement(user, current))?;
            validation::validate_details(&update.details).into_result()?;

            let mut announcement = current.clone();
            announcement.details = update.details;
            tables.announcements.insert(id, announcement.clone());

            for image in update.images_delete {
                if tables
                    .announcement_images
                    .get(&image)
                    .is_some_and(|row| row.announcement == id)
                {
                    tables.announcement_images.remove(&image);
                }
            }
            attach_images(tables, id, update.images);
            sync::on_updated(tables, &announcement)?;

            tracing::info!(announcement = %id, "announcement updated");
            Ok(views::detail(tables, &announcement))
        })
    }

    pub fn delete(&self, caller: Caller, id: AnnouncementId) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            let announcement = find_announcement(tables, id)?;
            access::ensure(access::owns_announcement(user, announcement))?;
            tables.remove_announcement(id);
            tracing::info!(announcement = %id, "announcement deleted");
            Ok(())
        })
    }

    pub fn feed(&self, caller: Caller, query: &FeedQuery) -> Result<Feed, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?;

            let mut published: Vec<&Announcement> = tables
                .announcements
                .values()
                .filter(|announcement| announcement.is_published())
                .filter(|announcement| query.matches(tables, announcement))
                .collect();
            published.sort_by_key(|announcement| views::feed_rank(tables, announcement));

            Ok(Feed {
                announcements: published
                    .into_iter()
                    .map(|announcement| views::card(tables, announcement))
                    .collect(),
                residential_complexes: tables
                    .complexes
                    .values()
                    .map(|complex| housing_views::summary(tables, complex))
                    .collect(),
                filters: tables.filters_of(user.id).cloned().collect(),
            })
        })?
    }

    /// Hidden unless approved, owned by the caller, or requested by staff.
    /// Views by anyone but the creator are counted.
    pub fn retrieve(
        &self,
        caller: Caller,
        id: AnnouncementId,
    ) -> Result<AnnouncementView, ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            let announcement = find_announcement(tables, id)?;
            let owner = access::owns_announcement(user, announcement);
            if !announcement.is_moderation_check && !owner {
                return Err(ServiceError::NotFound("announcement"));
            }

            let viewer = user.id;
            let mut announcement = announcement.clone();
            if announcement.creator != viewer {
                announcement.count_view += 1;
                tables.announcements.insert(id, announcement.clone());
            }
            Ok(views::detail(tables, &announcement))
        })
    }

    pub fn mine(&self, caller: Caller) -> Result<Vec<AnnouncementCard>, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?;
            Ok(tables
                .announcements
                .values()
                .filter(|announcement| announcement.creator == user.id)
                .map(|announcement| views::card(tables, announcement))
                .collect())
        })?
    }

    pub fn moderation_queue(&self, caller: Caller) -> Result<Vec<AnnouncementCard>, ServiceError> {
        self.store.read(|tables| {
            access::require_staff(access::actor(tables, caller)?)?;
            Ok(tables
                .announcements
                .values()
                .filter(|announcement| !announcement.is_moderation_check)
                .map(|announcement| views::card(tables, announcement))
                .collect())
        })?
    }

    /// Approval is one-way: an approved listing cannot be sent back.
    pub fn moderate(
        &self,
        caller: Caller,
        id: AnnouncementId,
        decision: ModerationDecision,
    ) -> Result<AnnouncementView, ServiceError> {
        self.store.write(|tables| {
            let moderator = access::actor(tables, caller)?;
            access::require_staff(moderator)?;
            let moderator = moderator.id;
            let mut announcement = find_announcement(tables, id)?.clone();

            if announcement.is_moderation_check && !decision.is_moderation_check {
                return Err(ServiceError::invalid(
                    "moderation_irreversible",
                    "Одобренное объявление нельзя вернуть на модерацию",
                ));
            }
            if decision.is_moderation_check && !announcement.is_moderation_check {
                announcement.is_moderation_check = true;
                tables.announcements.insert(id, announcement.clone());
                tracing::info!(announcement = %id, moderator = %moderator, "announcement approved");
            }
            Ok(views::detail(tables, &announcement))
        })
    }

    pub fn complain(&self, caller: Caller, draft: ComplaintDraft) -> Result<Complaint, ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            access::require_not_blacklisted(user)?;
            let creator = user.id;

            if !tables.announcements.contains_key(&draft.announcement) {
                return Err(ServiceError::invalid(
                    "error_announcement",
                    "Нет такого объявления",
                ));
            }
            let duplicate = tables.complaints.values().any(|complaint| {
                complaint.announcement == draft.announcement && complaint.creator == creator
            });
            if duplicate {
                return Err(ServiceError::invalid(
                    "already_complained",
                    "Вы уже жаловались на это обьявление",
                ));
            }

            let id = ComplaintId(tables.allocate());
            let complaint = Complaint {
                id,
                announcement: draft.announcement,
                creator,
                date_created: Utc::now(),
            };
            tables.complaints.insert(id, complaint.clone());
            tracing::info!(announcement = %draft.announcement, complaint = %id, "complaint filed");
            Ok(complaint)
        })
    }

    pub fn complaints(&self, caller: Caller) -> Result<Vec<Complaint>, ServiceError> {
        self.store.read(|tables| {
            access::require_staff(access::actor(tables, caller)?)?;
            Ok(tables.complaints.values().cloned().collect())
        })?
    }

    pub fn complaint(&self, caller: Caller, id: ComplaintId) -> Result<Complaint, ServiceError> {
        self.store.read(|tables| {
            access::require_staff(access::actor(tables, caller)?)?;
            tables
                .complaints
                .get(&id)
                .cloned()
                .ok_or(ServiceError::NotFound("complaint"))
        })?
    }

    pub fn delete_complaint(&self, caller: Caller, id: ComplaintId) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            access::require_staff(access::actor(tables, caller)?)?;
            tables
                .complaints
                .remove(&id)
                .map(|_| ())
                .ok_or(ServiceError::NotFound("complaint"))
        })
    }

    pub fn advertising(&self, caller: Caller, id: AdvertisingId) -> Result<Advertising, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?;
            let advertising = tables
                .advertising
                .get(&id)
                .ok_or(ServiceError::NotFound("advertising"))?;
            access::ensure(access::owns_advertising(tables, user, advertising))?;
            Ok(advertising.clone())
        })?
    }

    /// Buy a promotion period. Only an inactive slot can be activated; the expiry sweep
    /// is the only path back to inactive.
    pub fn activate_advertising(
        &self,
        caller: Caller,
        id: AdvertisingId,
        options: PromotionOptions,
        today: NaiveDate,
    ) -> Result<Advertising, ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            let current = tables
                .advertising
                .get(&id)
                .ok_or(ServiceError::NotFound("advertising"))?;
            access::ensure(access::owns_advertising(tables, user, current))?;
            if current.is_active {
                return Err(ServiceError::invalid(
                    "already_activated",
                    "Для вашего объявления уже используется продвижения!",
                ));
            }

            let advertising = Advertising {
                options,
                is_active: true,
                date_start: today,
                date_end: Some(calendar::month_ahead(today)),
                ..current.clone()
            };
            tables.advertising.insert(id, advertising.clone());
            tracing::info!(
                advertising = %id,
                announcement = %advertising.announcement,
                until = ?advertising.date_end,
                "advertising activated"
            );
            Ok(advertising)
        })
    }

    pub fn apartments(
        &self,
        caller: Caller,
        query: &ApartmentQuery,
    ) -> Result<Vec<ApartmentView>, ServiceError> {
        self.store.read(|tables| {
            access::actor(tables, caller)?;
            Ok(tables
                .apartments
                .values()
                .filter_map(|apartment| {
                    let announcement = tables.announcements.get(&apartment.announcement)?;
                    (announcement.is_moderation_check && query.matches(apartment, announcement))
                        .then(|| views::apartment(tables, apartment, announcement))
                })
                .collect())
        })?
    }

    pub fn apartment(&self, caller: Caller, id: ApartmentId) -> Result<ApartmentView, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?;
            let apartment = tables
                .apartments
                .get(&id)
                .ok_or(ServiceError::NotFound("apartment"))?;
            let announcement = find_announcement(tables, apartment.announcement)?;
            let visible = announcement.is_moderation_check
                || access::owns_announcement(user, announcement)
                || access::owns_apartment(tables, user, apartment);
            if !visible {
                return Err(ServiceError::NotFound("apartment"));
            }
            Ok(views::apartment(tables, apartment, announcement))
        })?
    }

    pub fn update_apartment(
        &self,
        caller: Caller,
        id: ApartmentId,
        update: ApartmentUpdate,
    ) -> Result<ApartmentView, ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            let current = tables
                .apartments
                .get(&id)
                .ok_or(ServiceError::NotFound("apartment"))?;
            access::ensure(access::owns_apartment(tables, user, current))?;

            let mut apartment = current.clone();
            if let Some(number) = update.number {
                apartment.number = number;
            }
            if update.floor.is_some() {
                apartment.floor = update.floor;
            }
            if update.corpus.is_some() {
                apartment.corpus = update.corpus;
            }
            if update.section.is_some() {
                apartment.section = update.section;
            }
            if let Some(booked) = update.is_booked {
                apartment.is_booked = booked;
            }
            tables.apartments.insert(id, apartment.clone());

            let announcement = find_announcement(tables, apartment.announcement)?;
            Ok(views::apartment(tables, &apartment, announcement))
        })
    }
}
