//! Messaging, the notary directory and staff user administration.

use chrono::Utc;
use serde::Deserialize;

use crate::access::{self, Caller};
use crate::error::ServiceError;
use crate::store::{EntityStore, MessageId, NotaryId, UserId};

use super::domain::{Message, MessageDraft, Notary, NotaryDraft, User, UserView};
use super::service::AccountService;
use super::validation as rules;

/// Staff user listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
    pub is_blacklist: Option<bool>,
}

impl UserQuery {
    fn matches(&self, user: &User) -> bool {
        if user.is_staff || user.is_developer {
            return false;
        }
        if self
            .is_blacklist
            .is_some_and(|blacklisted| blacklisted != user.is_blacklist)
        {
            return false;
        }
        let Some(needle) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
        else {
            return true;
        };

        let needle = needle.to_lowercase();
        user.id.to_string().contains(&needle)
            || [
                Some(user.first_name.as_str()),
                Some(user.last_name.as_str()),
                user.phone.as_deref(),
                Some(user.email.as_str()),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ConversationQuery {
    pub user_id: Option<UserId>,
}

impl<S> AccountService<S>
where
    S: EntityStore + 'static,
{
    /// No recipient means feedback to the staff.
    pub fn send_message(&self, caller: Caller, draft: MessageDraft) -> Result<Message, ServiceError> {
        self.store.write(|tables| {
            let sender = access::actor(tables, caller)?;
            access::require_not_blacklisted(sender)?;
            rules::validate_message(&draft).into_result()?;
            let sender = sender.id;
            if let Some(recipient) = draft.recipient {
                if !tables.users.contains_key(&recipient) {
                    return Err(ServiceError::invalid(
                        "recipient",
                        format!("Нет пользователя с id {recipient}"),
                    ));
                }
            }

            let id = MessageId(tables.allocate());
            let message = Message {
                id,
                sender,
                recipient: draft.recipient,
                text: draft.text.trim().to_string(),
                is_feedback: draft.is_feedback || draft.recipient.is_none(),
                files: draft.files,
                sent_at: Utc::now(),
            };
            tables.messages.insert(id, message.clone());
            tracing::debug!(message = %id, sender = %sender, "message sent");
            Ok(message)
        })
    }

    /// Messages involving the caller, optionally narrowed to one counterpart.
    pub fn messages(
        &self,
        caller: Caller,
        query: ConversationQuery,
    ) -> Result<Vec<Message>, ServiceError> {
        self.store.read(|tables| {
            let me = access::actor(tables, caller)?.id;
            let mut messages: Vec<Message> = tables
                .messages
                .values()
                .filter(|message| match query.user_id {
                    None => message.sender == me || message.recipient == Some(me),
                    Some(other) => {
                        (message.sender == me && message.recipient == Some(other))
                            || (message.sender == other && message.recipient == Some(me))
                    }
                })
                .cloned()
                .collect();
            messages.sort_by_key(|message| (message.sent_at, message.id));
            Ok(messages)
        })?
    }

    pub fn notaries(&self, caller: Caller) -> Result<Vec<Notary>, ServiceError> {
        self.store.read(|tables| {
            access::actor(tables, caller)?;
            Ok(tables.notaries.values().cloned().collect())
        })?
    }

    pub fn notary(&self, caller: Caller, id: NotaryId) -> Result<Notary, ServiceError> {
        self.store.read(|tables| {
            access::actor(tables, caller)?;
            tables
                .notaries
                .get(&id)
                .cloned()
                .ok_or(ServiceError::NotFound("notary"))
        })?
    }

    pub fn create_notary(&self, caller: Caller, draft: NotaryDraft) -> Result<Notary, ServiceError> {
        self.store.write(|tables| {
            access::require_staff(access::actor(tables, caller)?)?;
            rules::validate_notary(&draft).into_result()?;
            let id = NotaryId(tables.allocate());
            let notary = Notary {
                id,
                first_name: draft.first_name,
                last_name: draft.last_name,
                phone: draft.phone,
                email: rules::normalize_email(&draft.email),
                profile_image: draft.profile_image,
            };
            tables.notaries.insert(id, notary.clone());
            Ok(notary)
        })
    }

    pub fn update_notary(
        &self,
        caller: Caller,
        id: NotaryId,
        draft: NotaryDraft,
    ) -> Result<Notary, ServiceError> {
        self.store.write(|tables| {
            access::require_staff(access::actor(tables, caller)?)?;
            rules::validate_notary(&draft).into_result()?;
            if !tables.notaries.contains_key(&id) {
                return Err(ServiceError::NotFound("notary"));
            }
            let notary = Notary {
                id,
                first_name: draft.first_name,
                last_name: draft.last_name,
                phone: draft.phone,
                email: rules::normalize_email(&draft.email),
                profile_image: draft.profile_image,
            };
            tables.notaries.insert(id, notary.clone());
            Ok(notary)
        })
    }

    pub fn delete_notary(&self, caller: Caller, id: NotaryId) -> Result<(), ServiceError> {
        self.store.write(|tables| {
            access::require_staff(access::actor(tables, caller)?)?;
            tables
                .notaries
                .remove(&id)
                .map(|_| ())
                .ok_or(ServiceError::NotFound("notary"))
        })
    }

    pub fn users(&self, caller: Caller, query: &UserQuery) -> Result<Vec<UserView>, ServiceError> {
        self.store.read(|tables| {
            access::require_staff(access::actor(tables, caller)?)?;
            Ok(tables
                .users
                .values()
                .filter(|user| query.matches(user))
                .map(UserView::from)
                .collect())
        })?
    }

    pub fn user(&self, caller: Caller, id: UserId) -> Result<UserView, ServiceError> {
        self.store.read(|tables| {
            access::require_staff(access::actor(tables, caller)?)?;
            tables
                .users
                .get(&id)
                .map(UserView::from)
                .ok_or(ServiceError::NotFound("user"))
        })?
    }

    pub fn set_blacklist(
        &self,
        caller: Caller,
        id: UserId,
        is_blacklist: bool,
    ) -> Result<UserView, ServiceError> {
        self.store.write(|tables| {
            let moderator = access::actor(tables, caller)?;
            access::require_staff(moderator)?;
            let moderator = moderator.id;
            let user = tables
                .users
                .get_mut(&id)
                .ok_or(ServiceError::NotFound("user"))?;
            user.is_blacklist = is_blacklist;
            tracing::info!(user = %id, moderator = %moderator, is_blacklist, "blacklist updated");
            Ok(UserView::from(&*user))
        })
    }
}
