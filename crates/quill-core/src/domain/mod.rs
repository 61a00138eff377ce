//! Domain entities - the core business objects.

mod category;
mod patch;
mod post;
pub mod slug;
mod validate;

pub use category::{Category, CategoryChanges, CategoryDraft, CategoryUpdate, CategoryWithCount, NewCategory};
pub use patch::Patch;
pub use post::{
    CategoryRef, ListPosts, NewPost, Post, PostChanges, PostDetail, PostDraft, PostPage,
    PostPageQuery, PostSummary, PostUpdate, SearchHit, SearchPosts,
};
pub use slug::slugify;
pub use validate::Violations;
