//! `DataSource` over the backend's REST collections
//!
//! | operation | request |
//! |---|---|
//! | list | `GET {base}/{collection}?page&limit&search&sort_by&sort_dir&type` |
//! | create | `POST {base}/{collection}` |
//! | update | `PUT {base}/{collection}/{id}` |
//! | delete | `DELETE {base}/{collection}/{id}` |

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use fintrack_core::{CoreResult, DataSource, FetchParams, Mutation, Paginated, Resource};
use reqwest::Method;

use crate::ApiClient;

pub struct RestSource<R: Resource> {
    client: Arc<ApiClient>,
    _resource: PhantomData<R>,
}

impl<R: Resource> RestSource<R> {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Resource> DataSource<R> for RestSource<R> {
    async fn list(&self, params: &FetchParams<R::Kind>) -> CoreResult<Paginated<R::Item>> {
        let mut url = self.client.endpoint(&[R::KIND.collection()])?;
        url.query_pairs_mut().extend_pairs(params.query_pairs());

        let page: Paginated<R::Item> = self
            .client
            .send_json(self.client.request(Method::GET, url))
            .await?;
        Ok(page)
    }

    async fn create(&self, form: &R::Form) -> CoreResult<Mutation<R::Item>> {
        let url = self.client.endpoint(&[R::KIND.collection()])?;
        let created = self
            .client
            .send_json(self.client.request(Method::POST, url).json(form))
            .await?;
        Ok(created)
    }

    async fn update(&self, id: &str, form: &R::Form) -> CoreResult<Mutation<R::Item>> {
        let url = self.client.endpoint(&[R::KIND.collection(), id])?;
        let updated = self
            .client
            .send_json(self.client.request(Method::PUT, url).json(form))
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        let url = self.client.endpoint(&[R::KIND.collection(), id])?;
        self.client
            .send_empty(self.client.request(Method::DELETE, url))
            .await?;
        Ok(())
    }
}
