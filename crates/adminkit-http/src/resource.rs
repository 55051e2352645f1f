//! Generic CRUD over the paginated resource collections.

use std::marker::PhantomData;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, instrument};

use adminkit_core::error::AuthError;
use adminkit_core::{Entity, EntityId, Page, PageMeta, PageRequest, ResourceKind, Result, User};

use crate::http::{ApiRequest, Envelope, HttpClient};

/// CRUD calls against one collection.
///
/// Calls fail fast with [`AuthError::NotAuthenticated`] when no session is
/// active; otherwise they go through the client's refresh protocol.
pub struct Resource<T> {
    client: HttpClient,
    kind: ResourceKind,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            kind: self.kind,
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource").field("kind", &self.kind).finish()
    }
}

impl<T: Entity> Resource<T> {
    pub fn new(client: HttpClient, kind: ResourceKind) -> Self {
        Self {
            client,
            kind,
            _entity: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn item_path(&self, id: &EntityId) -> String {
        format!("{}/{}", self.kind.path(), id)
    }

    fn ensure_session(&self) -> Result<()> {
        if self.client.tokens().is_authenticated() {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated.into())
        }
    }

    /// Fetch one page of the collection.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub async fn list(&self, page: PageRequest) -> Result<Page<T>> {
        self.ensure_session()?;
        debug!(page = page.page, per_page = page.per_page, "Listing");
        let request = ApiRequest::get(self.kind.path()).query(&page)?;
        self.client.send(request).await
    }

    /// Fetch the whole collection in one unpaginated call.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub async fn all(&self) -> Result<Vec<T>> {
        self.ensure_session()?;
        let envelope: Envelope<Vec<T>> = self.client.send(ApiRequest::get(self.kind.path())).await?;
        Ok(envelope.data)
    }

    #[instrument(skip(self), fields(kind = %self.kind, %id))]
    pub async fn get(&self, id: &EntityId) -> Result<T> {
        self.ensure_session()?;
        let envelope: Envelope<T> = self.client.send(ApiRequest::get(self.item_path(id))).await?;
        Ok(envelope.data)
    }

    /// Create an entity, returning it as stored by the server.
    #[instrument(skip(self, entity), fields(kind = %self.kind))]
    pub async fn create(&self, entity: &T) -> Result<T> {
        self.ensure_session()?;
        debug!("Creating");
        let request = ApiRequest::post(self.kind.path()).json(entity)?;
        let envelope: Envelope<T> = self.client.send(request).await?;
        Ok(envelope.data)
    }

    /// Replace an entity, returning it as stored by the server.
    #[instrument(skip(self, entity), fields(kind = %self.kind, %id))]
    pub async fn update(&self, id: &EntityId, entity: &T) -> Result<T> {
        self.ensure_session()?;
        debug!("Updating");
        let request = ApiRequest::put(self.item_path(id)).json(entity)?;
        let envelope: Envelope<T> = self.client.send(request).await?;
        Ok(envelope.data)
    }

    #[instrument(skip(self), fields(kind = %self.kind, %id))]
    pub async fn delete(&self, id: &EntityId) -> Result<()> {
        self.ensure_session()?;
        debug!("Deleting");
        self.client
            .send_no_content(ApiRequest::delete(self.item_path(id)))
            .await
    }
}

#[derive(Debug)]
struct ListState<T> {
    items: Vec<T>,
    meta: Option<PageMeta>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: None,
        }
    }
}

/// A [`Resource`] plus the locally held list it keeps in step.
///
/// Fetching replaces the list, creating appends, updating replaces the
/// entity with the same id, and deleting removes it. The list only changes
/// after the server call succeeds.
#[derive(Debug)]
pub struct ResourceStore<T> {
    resource: Resource<T>,
    state: RwLock<ListState<T>>,
}

impl<T: Entity> ResourceStore<T> {
    pub fn new(resource: Resource<T>) -> Self {
        Self {
            resource,
            state: RwLock::new(ListState::default()),
        }
    }

    pub fn resource(&self) -> &Resource<T> {
        &self.resource
    }

    /// The entities currently held.
    pub fn items(&self) -> Vec<T> {
        self.read().items.clone()
    }

    /// Pagination metadata of the last fetched page.
    pub fn meta(&self) -> Option<PageMeta> {
        self.read().meta.clone()
    }

    pub fn find(&self, id: &EntityId) -> Option<T> {
        self.read()
            .items
            .iter()
            .find(|item| item.id() == Some(id))
            .cloned()
    }

    /// Fetch a page and make it the held list.
    pub async fn fetch(&self, page: PageRequest) -> Result<PageMeta> {
        let page = self.resource.list(page).await?;
        let mut state = self.write();
        state.items = page.data;
        state.meta = Some(page.meta.clone());
        Ok(page.meta)
    }

    /// Fetch the whole collection and make it the held list.
    pub async fn fetch_all(&self) -> Result<usize> {
        let items = self.resource.all().await?;
        let mut state = self.write();
        state.items = items;
        state.meta = None;
        Ok(state.items.len())
    }

    pub async fn create(&self, entity: &T) -> Result<T> {
        let created = self.resource.create(entity).await?;
        self.write().items.push(created.clone());
        Ok(created)
    }

    pub async fn update(&self, id: &EntityId, entity: &T) -> Result<T> {
        let updated = self.resource.update(id, entity).await?;
        let mut state = self.write();
        if let Some(slot) = state.items.iter_mut().find(|item| item.id() == Some(id)) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: &EntityId) -> Result<()> {
        self.resource.delete(id).await?;
        self.write().items.retain(|item| item.id() != Some(id));
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, ListState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResourceStore<User> {
    /// Held users that have the named role.
    pub fn users_by_role(&self, role: &str) -> Vec<User> {
        self.read()
            .items
            .iter()
            .filter(|user| user.has_role(role))
            .cloned()
            .collect()
    }
}
