use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::access::{self, Caller};
use crate::calendar;
use crate::error::ServiceError;
use crate::housing::domain::{
    Benefits, ComplexDetails, RegistrationAndPayment, ResidentialComplex,
};
use crate::store::{ComplexId, ContactId, EntityStore, SubscriptionId, Tables, UserId};
use crate::validation::ValidationErrors;

use super::domain::{
    Contact, ContactKind, ContactUpdate, NotificationTarget, ProfileUpdate, Registration,
    Subscription, User, UserView,
};
use super::validation::{self as rules, normalize_email};

/// User accounts and everything a single user owns outright: profile, agent contact,
/// subscription, saved filters, messages and favorites.
pub struct AccountService<S> {
    pub(super) store: Arc<S>,
}

pub(super) fn own_subscription(tables: &Tables, user: UserId) -> Result<&Subscription, ServiceError> {
    tables
        .subscription_of(user)
        .ok_or(ServiceError::NotFound("subscription"))
}

fn ensure_email_free(
    tables: &Tables,
    email: &str,
    except: Option<UserId>,
) -> Result<(), ServiceError> {
    let taken = tables
        .user_by_email(email)
        .is_some_and(|user| Some(user.id) != except);
    if taken {
        return Err(ServiceError::invalid(
            "email_taken",
            "Пользователь с таким email уже существует",
        ));
    }
    Ok(())
}

/// Dependents every new account starts with: a developer gets their complex, a member
/// an agent contact and an inactive subscription.
fn bootstrap(tables: &mut Tables, user: &User, today: NaiveDate) {
    if user.is_staff {
        return;
    }

    if user.is_developer {
        let complex = ComplexId(tables.allocate());
        tables.complexes.insert(
            complex,
            ResidentialComplex {
                id: complex,
                developer: user.id,
                details: ComplexDetails::placeholder(),
                commissioning_date: today,
            },
        );
        tables.benefits.insert(complex, Benefits::default());
        tables
            .registrations
            .insert(complex, RegistrationAndPayment::default());
        let contact = ContactId(tables.allocate());
        tables.contacts.insert(
            contact,
            Contact {
                id: contact,
                kind: ContactKind::SalesDepartment,
                first_name: String::new(),
                last_name: String::new(),
                phone: None,
                email: None,
                residential_complex: Some(complex),
                user: None,
            },
        );
        tracing::debug!(user = %user.id, complex = %complex, "developer complex bootstrapped");
        return;
    }

    let contact = ContactId(tables.allocate());
    tables.contacts.insert(
        contact,
        Contact {
            id: contact,
            kind: ContactKind::AgentContacts,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            email: Some(user.email.clone()),
            residential_complex: None,
            user: Some(user.id),
        },
    );
    let subscription = SubscriptionId(tables.allocate());
    tables.subscriptions.insert(
        subscription,
        Subscription {
            id: subscription,
            user: user.id,
            date_start: today,
            date_end: None,
            is_active: false,
            is_auto_renewal: false,
        },
    );
}

impl<S> AccountService<S>
where
    S: EntityStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn register(
        &self,
        registration: Registration,
        today: NaiveDate,
    ) -> Result<UserView, ServiceError> {
        self.insert_user(registration, false, today)
    }

    /// Staff account for the admin tooling; no dependents are created.
    pub fn create_superuser(
        &self,
        registration: Registration,
        today: NaiveDate,
    ) -> Result<UserView, ServiceError> {
        self.insert_user(registration, true, today)
    }

    fn insert_user(
        &self,
        registration: Registration,
        is_staff: bool,
        today: NaiveDate,
    ) -> Result<UserView, ServiceError> {
        rules::validate_registration(&registration).into_result()?;
        let email = normalize_email(&registration.email);

        let view = self.store.write(|tables| {
            ensure_email_free(tables, &email, None)?;

            let id = UserId(tables.allocate());
            let user = User {
                id,
                email,
                first_name: registration.first_name.trim().to_string(),
                last_name: registration.last_name.trim().to_string(),
                phone: registration.phone,
                profile_image: None,
                is_staff,
                is_developer: registration.is_developer && !is_staff,
                is_active: true,
                per_agent: false,
                is_blacklist: false,
                notification: NotificationTarget::default(),
                date_joined: Utc::now(),
            };
            bootstrap(tables, &user, today);
            let view = UserView::from(&user);
            tables.users.insert(id, user);
            Ok::<_, ServiceError>(view)
        })?;

        tracing::info!(user = %view.id, role = ?view.role, "account registered");
        Ok(view)
    }

    pub fn profile(&self, caller: Caller) -> Result<UserView, ServiceError> {
        self.store
            .read(|tables| access::actor(tables, caller).map(UserView::from))?
    }

    pub fn update_profile(
        &self,
        caller: Caller,
        update: ProfileUpdate,
    ) -> Result<UserView, ServiceError> {
        let mut errors = ValidationErrors::new();
        if let Some(first_name) = &update.first_name {
            rules::check_name(&mut errors, "first_name", first_name);
        }
        if let Some(last_name) = &update.last_name {
            rules::check_name(&mut errors, "last_name", last_name);
        }
        if let Some(email) = &update.email {
            rules::check_email(&mut errors, email);
        }
        errors.into_result()?;

        self.update_user(caller, |tables, user| {
            if let Some(email) = update.email.as_deref().map(normalize_email) {
                ensure_email_free(tables, &email, Some(user.id))?;
                user.email = email;
            }
            if let Some(first_name) = update.first_name {
                user.first_name = first_name.trim().to_string();
            }
            if let Some(last_name) = update.last_name {
                user.last_name = last_name.trim().to_string();
            }
            if update.phone.is_some() {
                user.phone = update.phone;
            }
            if update.profile_image.is_some() {
                user.profile_image = update.profile_image;
            }
            Ok(())
        })
    }

    pub fn set_notification(
        &self,
        caller: Caller,
        target: NotificationTarget,
    ) -> Result<UserView, ServiceError> {
        self.update_user(caller, |_, user| {
            user.notification = target;
            Ok(())
        })
    }

    /// Route calls and messages to the agent contact instead of the user.
    pub fn set_per_agent(&self, caller: Caller, per_agent: bool) -> Result<UserView, ServiceError> {
        self.update_user(caller, |_, user| {
            user.per_agent = per_agent;
            Ok(())
        })
    }

    fn update_user(
        &self,
        caller: Caller,
        change: impl FnOnce(&Tables, &mut User) -> Result<(), ServiceError>,
    ) -> Result<UserView, ServiceError> {
        self.store.write(|tables| {
            let mut user = access::actor(tables, caller)?.clone();
            change(tables, &mut user)?;
            let view = UserView::from(&user);
            tables.users.insert(user.id, user);
            Ok(view)
        })
    }

    pub fn agent_contact(&self, caller: Caller) -> Result<Contact, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?;
            tables
                .agent_contact_of(user.id)
                .cloned()
                .ok_or(ServiceError::NotFound("agent contact"))
        })?
    }

    pub fn update_agent_contact(
        &self,
        caller: Caller,
        update: ContactUpdate,
    ) -> Result<Contact, ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            let mut contact = tables
                .agent_contact_of(user.id)
                .cloned()
                .ok_or(ServiceError::NotFound("agent contact"))?;
            contact.apply(update);
            tables.contacts.insert(contact.id, contact.clone());
            Ok(contact)
        })
    }

    pub fn subscription(&self, caller: Caller) -> Result<Subscription, ServiceError> {
        self.store.read(|tables| {
            let user = access::actor(tables, caller)?;
            own_subscription(tables, user.id).cloned()
        })?
    }

    /// Start a paid month. Only an inactive subscription can be activated.
    pub fn activate_subscription(
        &self,
        caller: Caller,
        today: NaiveDate,
    ) -> Result<Subscription, ServiceError> {
        self.change_subscription(caller, |subscription| {
            if subscription.is_active {
                return Err(ServiceError::NotFound("inactive subscription"));
            }
            subscription.is_active = true;
            subscription.is_auto_renewal = true;
            subscription.date_start = today;
            subscription.date_end = Some(calendar::month_ahead(today));
            Ok(())
        })
    }

    /// Extend an active subscription by the length of the month it currently ends in.
    pub fn renew_subscription(
        &self,
        caller: Caller,
        today: NaiveDate,
    ) -> Result<Subscription, ServiceError> {
        self.change_subscription(caller, |subscription| {
            if !subscription.is_active {
                return Err(ServiceError::NotFound("active subscription"));
            }
            let base = subscription.date_end.unwrap_or(today);
            subscription.date_end = Some(calendar::month_ahead(base));
            Ok(())
        })
    }

    pub fn set_auto_renewal(
        &self,
        caller: Caller,
        enabled: bool,
    ) -> Result<Subscription, ServiceError> {
        self.change_subscription(caller, |subscription| {
            subscription.is_auto_renewal = enabled;
            Ok(())
        })
    }

    fn change_subscription(
        &self,
        caller: Caller,
        change: impl FnOnce(&mut Subscription) -> Result<(), ServiceError>,
    ) -> Result<Subscription, ServiceError> {
        self.store.write(|tables| {
            let user = access::actor(tables, caller)?;
            let mut subscription = own_subscription(tables, user.id)?.clone();
            change(&mut subscription)?;
            tables
                .subscriptions
                .insert(subscription.id, subscription.clone());
            tracing::info!(
                subscription = %subscription.id,
                active = subscription.is_active,
                auto_renewal = subscription.is_auto_renewal,
                until = ?subscription.date_end,
                "subscription changed"
            );
            Ok(subscription)
        })
    }
}
