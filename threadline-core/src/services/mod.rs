//! Thread graph operations
//!
//! Every operation takes its collaborators explicitly: a `&dyn Store` and,
//! for mutations, a `&dyn Revalidator` that is notified once all writes
//! have succeeded.

pub mod authoring;
pub mod comment;
pub mod detail;
pub mod feed;
pub mod profiles;

mod resolve;
mod saga;

pub use authoring::{create_thread, NewPost};
pub use comment::{add_comment_to_thread, NewComment};
pub use detail::fetch_thread_by_id;
pub use feed::fetch_posts;
pub use profiles::{
    fetch_community_threads, fetch_user, fetch_user_threads, upsert_community, upsert_user,
    ProfileUpdate,
};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{CommunityRecord, CommunityUpdate, DisplayName, UserRecord, UserUpdate, Username};
    use crate::store::{MemoryStore, Store};

    pub async fn seed_user(store: &MemoryStore, external_id: &str, name: &str) -> UserRecord {
        store
            .upsert_user(UserUpdate {
                external_id: external_id.to_string(),
                username: Username::new(external_id).unwrap(),
                name: DisplayName::new(name).unwrap(),
                image: Some(format!("https://img.example/{}.png", external_id)),
                bio: None,
            })
            .await
            .unwrap()
    }

    pub async fn seed_community(store: &MemoryStore, external_id: &str) -> CommunityRecord {
        store
            .upsert_community(CommunityUpdate {
                external_id: external_id.to_string(),
                username: Username::new(external_id).unwrap(),
                name: DisplayName::new("Rustaceans").unwrap(),
                image: None,
                bio: None,
            })
            .await
            .unwrap()
    }
}
