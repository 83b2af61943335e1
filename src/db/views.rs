//! Point-in-time read views over the content model
//!
//! The progress and analytics engines are pure functions over these views;
//! the loaders here do the only database work. Views are recomputed on every
//! call and never cached, so percentages are a snapshot, not a promise of
//! transactional consistency with concurrent writes.

use bson::doc;
use std::collections::HashMap;

use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{
    ActivityDoc, BlockDoc, FileDoc, MemberDoc, PageDoc, ResponseDoc, SpaceDoc,
    ACTIVITY_COLLECTION, BLOCK_COLLECTION, FILE_COLLECTION, MEMBER_COLLECTION, PAGE_COLLECTION,
    RESPONSE_COLLECTION, SPACE_COLLECTION,
};
use crate::types::{GangwayError, Result};

/// Everything the per-space engines need, loaded in one pass
#[derive(Clone, Debug, Default)]
pub struct SpaceView {
    pub space: SpaceDoc,
    /// Non-deleted pages of the space
    pub pages: Vec<PageDoc>,
    /// Non-deleted blocks belonging to those pages
    pub blocks: Vec<BlockDoc>,
    /// Responses keyed by block id (at most one each)
    pub responses: HashMap<String, ResponseDoc>,
    /// Non-deleted files grouped by block id
    pub files: HashMap<String, Vec<FileDoc>>,
}

/// Org-wide view for cross-space analytics
#[derive(Clone, Debug, Default)]
pub struct OrgView {
    pub spaces: Vec<SpaceView>,
    /// Stakeholder invites across all spaces of the org
    pub members: Vec<MemberDoc>,
    /// Activity entries across all spaces of the org, ascending by time
    pub activity: Vec<ActivityDoc>,
}

/// Loader holding the typed collections the views read from
#[derive(Clone)]
pub struct ViewLoader {
    spaces: MongoCollection<SpaceDoc>,
    pages: MongoCollection<PageDoc>,
    blocks: MongoCollection<BlockDoc>,
    responses: MongoCollection<ResponseDoc>,
    files: MongoCollection<FileDoc>,
    members: MongoCollection<MemberDoc>,
    activity: MongoCollection<ActivityDoc>,
}

impl ViewLoader {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            spaces: client.collection(SPACE_COLLECTION).await?,
            pages: client.collection(PAGE_COLLECTION).await?,
            blocks: client.collection(BLOCK_COLLECTION).await?,
            responses: client.collection(RESPONSE_COLLECTION).await?,
            files: client.collection(FILE_COLLECTION).await?,
            members: client.collection(MEMBER_COLLECTION).await?,
            activity: client.collection(ACTIVITY_COLLECTION).await?,
        })
    }

    /// Load a single space's view. Soft-deleted spaces read as not found.
    pub async fn load_space_view(&self, space_id: &str) -> Result<SpaceView> {
        let space = self
            .spaces
            .find_one(doc! { "space_id": space_id })
            .await?
            .ok_or_else(|| GangwayError::NotFound(format!("space {space_id}")))?;

        self.load_view_for(space).await
    }

    async fn load_view_for(&self, space: SpaceDoc) -> Result<SpaceView> {
        let space_id = space.space_id.clone();
        let mut pages = self.pages.find_many(doc! { "space_id": &space_id }).await?;
        pages.sort_by_key(|p| p.position);

        // Blocks are denormalized by space; keep only those whose page is
        // still live, so blocks of a soft-deleted page drop out of every
        // aggregate with it.
        let live_pages: std::collections::HashSet<String> =
            pages.iter().map(|p| p.page_id.clone()).collect();
        let mut blocks: Vec<BlockDoc> = self
            .blocks
            .find_many(doc! { "space_id": &space_id })
            .await?
            .into_iter()
            .filter(|b| live_pages.contains(&b.page_id))
            .collect();
        blocks.sort_by_key(|b| b.position);

        let responses: HashMap<String, ResponseDoc> = self
            .responses
            .find_many(doc! { "space_id": &space_id })
            .await?
            .into_iter()
            .map(|r| (r.block_id.clone(), r))
            .collect();

        let mut files: HashMap<String, Vec<FileDoc>> = HashMap::new();
        for file in self.files.find_many(doc! { "space_id": &space_id }).await? {
            files.entry(file.block_id.clone()).or_default().push(file);
        }

        Ok(SpaceView {
            space,
            pages,
            blocks,
            responses,
            files,
        })
    }

    /// Load the org-wide view for analytics. Soft-deleted spaces are
    /// excluded here and therefore from every downstream aggregate.
    pub async fn load_org_view(&self, org_id: &str) -> Result<OrgView> {
        let org_spaces = self.spaces.find_many(doc! { "org_id": org_id }).await?;

        let space_ids: Vec<String> = org_spaces.iter().map(|s| s.space_id.clone()).collect();

        let mut spaces = Vec::with_capacity(org_spaces.len());
        for space in org_spaces {
            spaces.push(self.load_view_for(space).await?);
        }

        let members = self
            .members
            .find_many(doc! { "space_id": { "$in": space_ids.clone() } })
            .await?;

        let mut activity = self
            .activity
            .find_many(doc! { "space_id": { "$in": space_ids } })
            .await?;
        activity.sort_by_key(|a| a.occurred_at);

        Ok(OrgView {
            spaces,
            members,
            activity,
        })
    }
}
