use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Error, PostStore, Unique, UserStore};
use crate::route::{
	auth::model::{NewUser, User},
	post::model::{CreatePostInput, Post, UpdatePostInput},
};

/// A [`Store`](super::Store) that keeps everything in memory, in insertion order.
#[derive(Default)]
pub struct MemoryStore {
	users: RwLock<Vec<User>>,
	posts: RwLock<Vec<Post>>,
}

#[axum::async_trait]
impl UserStore for MemoryStore {
	async fn insert_user(&self, user: NewUser) -> Result<User, Error> {
		let mut users = self.users.write().await;

		if users.iter().any(|u| u.email == user.email) {
			return Err(Error::Duplicate(Unique::Email));
		}

		if users.iter().any(|u| u.username == user.username) {
			return Err(Error::Duplicate(Unique::Username));
		}

		let user = User {
			id: Uuid::new_v4(),
			firstname: user.firstname,
			lastname: user.lastname,
			username: user.username,
			email: user.email,
			password: user.password,
			created_at: chrono::Utc::now(),
		};

		users.push(user.clone());
		Ok(user)
	}

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
	}

	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
		Ok(self
			.users
			.read()
			.await
			.iter()
			.find(|u| u.email == email)
			.cloned())
	}

	async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, Error> {
		Ok(self
			.users
			.read()
			.await
			.iter()
			.filter(|u| ids.contains(&u.id))
			.cloned()
			.collect())
	}
}

#[axum::async_trait]
impl PostStore for MemoryStore {
	async fn insert_post(&self, author_id: Uuid, input: CreatePostInput) -> Result<Post, Error> {
		let post = Post {
			id: Uuid::new_v4(),
			author_id,
			title: input.title,
			content: input.content,
			image: input.image,
			created_at: chrono::Utc::now(),
		};

		self.posts.write().await.push(post.clone());
		Ok(post)
	}

	async fn list_posts(&self) -> Result<Vec<Post>, Error> {
		Ok(self.posts.read().await.clone())
	}

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		Ok(self.posts.read().await.iter().find(|p| p.id == id).cloned())
	}

	async fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<Option<Post>, Error> {
		let mut posts = self.posts.write().await;
		let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
			return Ok(None);
		};

		if let Some(title) = input.title {
			post.title = title;
		}

		if let Some(content) = input.content {
			post.content = content;
		}

		if let Some(image) = input.image {
			post.image = image;
		}

		Ok(Some(post.clone()))
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool, Error> {
		let mut posts = self.posts.write().await;
		let before = posts.len();

		posts.retain(|p| p.id != id);

		Ok(posts.len() != before)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn new_user(username: &str, email: &str) -> NewUser {
		NewUser {
			firstname: "John".into(),
			lastname: "Smith".into(),
			username: username.into(),
			email: email.into(),
			password: "$argon2id$not-a-real-hash".into(),
		}
	}

	#[tokio::test]
	async fn test_insert_user_unique_fields() {
		let store = MemoryStore::default();

		store
			.insert_user(new_user("john", "john@smith.com"))
			.await
			.unwrap();

		let email = store.insert_user(new_user("jane", "john@smith.com")).await;
		assert!(matches!(email, Err(Error::Duplicate(Unique::Email))));

		let username = store.insert_user(new_user("john", "jane@smith.com")).await;
		assert!(matches!(username, Err(Error::Duplicate(Unique::Username))));
	}

	#[tokio::test]
	async fn test_find_users_skips_unknown_ids() {
		let store = MemoryStore::default();
		let user = store
			.insert_user(new_user("john", "john@smith.com"))
			.await
			.unwrap();

		let users = store.find_users(&[user.id, Uuid::new_v4()]).await.unwrap();

		assert_eq!(users.len(), 1);
		assert_eq!(users[0].id, user.id);
	}

	#[tokio::test]
	async fn test_update_and_delete_post() {
		let store = MemoryStore::default();
		let author = Uuid::new_v4();
		let post = store
			.insert_post(
				author,
				CreatePostInput {
					title: "Title".into(),
					content: "Content".into(),
					image: "https://example.com/a.png".into(),
				},
			)
			.await
			.unwrap();

		let updated = store
			.update_post(
				post.id,
				UpdatePostInput {
					title: Some("New title".into()),
					..Default::default()
				},
			)
			.await
			.unwrap()
			.unwrap();

		assert_eq!(updated.title, "New title");
		assert_eq!(updated.content, "Content");
		assert_eq!(updated.author_id, author);

		assert!(store.delete_post(post.id).await.unwrap());
		assert!(!store.delete_post(post.id).await.unwrap());
		assert!(store.find_post(post.id).await.unwrap().is_none());
	}
}
