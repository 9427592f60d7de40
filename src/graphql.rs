//! GraphQL schema for the gallery.
//!
//! ```graphql
//! type Query {
//!   images: [Image!]!
//!   image(id: ID!): Image
//! }
//!
//! type Mutation {
//!   likeImage(id: ID!): Image
//!   markFeatured(id: ID!): Image
//! }
//! ```

use async_graphql::{Context, EmptySubscription, Object, Response, Schema, ID};

use crate::catalog::Image;
use crate::error::{GalleryError, Result};
use crate::gallery::Gallery;

pub type GallerySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with `gallery` as shared resolver data.
pub fn build_schema(gallery: Gallery) -> GallerySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(gallery)
        .finish()
}

/// SDL text of the schema. Needs no gallery data.
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}

/// Run a single query document against the schema.
pub async fn execute(schema: &GallerySchema, query: &str) -> Response {
    schema.execute(query).await
}

/// Run a gallery operation on the blocking pool.
async fn run_blocking<T, F>(ctx: &Context<'_>, op: F) -> async_graphql::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Gallery) -> Result<T> + Send + 'static,
{
    let gallery = ctx.data::<Gallery>()?.clone();
    let result = tokio::task::spawn_blocking(move || op(&gallery))
        .await
        .map_err(GalleryError::from)?;
    Ok(result?)
}

#[Object]
impl Image {
    async fn id(&self) -> ID {
        ID(self.id.clone())
    }

    async fn src(&self) -> &str {
        &self.src
    }

    async fn alt(&self) -> &str {
        &self.alt
    }

    async fn likes(&self) -> i32 {
        self.likes
    }

    async fn is_featured(&self) -> bool {
        self.is_featured
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All images in the gallery directory.
    async fn images(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Image>> {
        run_blocking(ctx, |gallery| gallery.images()).await
    }

    /// One image by ID.
    async fn image(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<Image>> {
        run_blocking(ctx, move |gallery| gallery.image(&id)).await
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Like an unliked image, or unlike a liked one.
    async fn like_image(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<Image>> {
        run_blocking(ctx, move |gallery| gallery.like_image(&id)).await
    }

    /// Mark an image as featured, or clear the mark.
    async fn mark_featured(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<Image>> {
        run_blocking(ctx, move |gallery| gallery.mark_featured(&id)).await
    }
}
