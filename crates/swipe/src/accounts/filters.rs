use crate::access::{self, Caller};
use crate::error::ServiceError;
use crate::store::{EntityStore, FilterId, Tables};

use super::domain::{FilterCriteria, SavedFilter, User};
use super::service::AccountService;
use super::validation::{self as rules, MAX_FILTERS_PER_USER};

/// Foreign filters are reported as missing.
fn own_filter<'a>(
    tables: &'a Tables,
    user: &User,
    id: FilterId,
) -> Result<&'a SavedFilter, ServiceError> {
    tables
        .filters
        .get(&id)
        .filter(|filter| access::owns_filter(user, filter))
        .ok_or(ServiceError::NotFound("filter"))
}

impl<S> AccountService<S>
where
    S: EntityStore + 'static,
{
    pub fn filters(&self, caller: Caller) -> Result<Vec<SavedFilter>, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?;
            Ok(tables.filters_of(user.id).cloned().collect())
        })?
    }

    pub fn create_filter(
        &self,
        caller: Caller,
        criteria: FilterCriteria,
    ) -> Result<SavedFilter, ServiceError> {
        self.store.write(|tables| {
            let owner = access::actor(tables, caller)?.id;
            rules::validate_filter(&criteria).into_result()?;
            if tables.filters_of(owner).count() >= MAX_FILTERS_PER_USER {
                return Err(ServiceError::invalid(
                    "error_max_count_user_filter",
                    format!("The maximum count of saved filters is {MAX_FILTERS_PER_USER}"),
                ));
            }

            let id = FilterId(tables.allocate());
            let filter = SavedFilter {
                id,
                user: owner,
                criteria,
            };
            tables.filters.insert(id, filter.clone());
            Ok(filter)
        })
    }

    pub fn filter(&self, caller: Caller, id: FilterId) -> Result<SavedFilter, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?;
            own_filter(tables, user, id).cloned()
        })?
    }

    pub fn update_filter(
        &self,
        caller: Caller,
        id: FilterId,
        criteria: FilterCriteria,
    ) -> Result<SavedFilter, ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            let mut filter = own_filter(tables, user, id)?.clone();
            rules::validate_filter(&criteria).into_result()?;
            filter.criteria = criteria;
            tables.filters.insert(id, filter.clone());
            Ok(filter)
        })
    }

    pub fn delete_filter(&self, caller: Caller, id: FilterId) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            own_filter(tables, user, id)?;
            tables.filters.remove(&id);
            Ok(())
        })
    }
}
