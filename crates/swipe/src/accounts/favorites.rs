use crate::access::{self, Caller};
use crate::error::ServiceError;
use crate::housing::domain::ComplexSummary;
use crate::housing::views as housing_views;
use crate::listings::domain::AnnouncementCard;
use crate::listings::views as listing_views;
use crate::store::{AnnouncementId, ComplexId, EntityStore};

use super::service::AccountService;

impl<S> AccountService<S>
where
    S: EntityStore + 'static,
{
    pub fn favorite_announcements(
        &self,
        caller: Caller,
    ) -> Result<Vec<AnnouncementCard>, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?.id;
            Ok(tables
                .favorite_announcements
                .range((user, AnnouncementId(0))..=(user, AnnouncementId(u64::MAX)))
                .filter_map(|(_, id)| tables.announcements.get(id))
                .map(|announcement| listing_views::card(tables, announcement))
                .collect())
        })?
    }

    pub fn add_favorite_announcement(
        &self,
        caller: Caller,
        id: AnnouncementId,
    ) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?.id;
            if !tables.announcements.contains_key(&id) {
                return Err(ServiceError::invalid(
                    "error_announcement",
                    "Нет такого объявления",
                ));
            }
            tables.favorite_announcements.insert((user, id));
            Ok(())
        })
    }

    /// Removing something that is not a favorite is a no-op.
    pub fn remove_favorite_announcement(
        &self,
        caller: Caller,
        id: AnnouncementId,
    ) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?.id;
            tables.favorite_announcements.remove(&(user, id));
            Ok(())
        })
    }

    pub fn favorite_complexes(&self, caller: Caller) -> Result<Vec<ComplexSummary>, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?.id;
            Ok(tables
                .favorite_complexes
                .range((user, ComplexId(0))..=(user, ComplexId(u64::MAX)))
                .filter_map(|(_, id)| tables.complexes.get(id))
                .map(|complex| housing_views::summary(tables, complex))
                .collect())
        })?
    }

    pub fn add_favorite_complex(&self, caller: Caller, id: ComplexId) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?.id;
            if !tables.complexes.contains_key(&id) {
                return Err(ServiceError::invalid(
                    "error_residential_complex",
                    "Нет такого ЖК",
                ));
            }
            tables.favorite_complexes.insert((user, id));
            Ok(())
        })
    }

    pub fn remove_favorite_complex(
        &self,
        caller: Caller,
        id: ComplexId,
    ) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?.id;
            tables.favorite_complexes.remove(&(user, id));
            Ok(())
        })
    }
}
