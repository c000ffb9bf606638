use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // User profiles. The unique subject_id index is what makes concurrent
    // first-login find-or-create safe: the losing writer gets a duplicate
    // key error and re-fetches the row that won.
    create_indexes(
        db,
        "user_profiles",
        vec![
            index_unique(bson::doc! { "subject_id": 1 }),
            index(bson::doc! { "email": 1 }),
        ],
    )
    .await?;

    // Companies
    create_indexes(
        db,
        "companies",
        vec![index(bson::doc! { "owner_profile_id": 1 })],
    )
    .await?;

    // Team members. One membership per linked user (sparse: invite rows
    // without a linked profile are exempt until linked).
    create_indexes(
        db,
        "team_members",
        vec![
            index_unique_sparse(bson::doc! { "user_id": 1 }),
            index_unique(bson::doc! { "company_id": 1, "email": 1 }),
        ],
    )
    .await?;

    // Projects
    create_indexes(
        db,
        "projects",
        vec![index(bson::doc! { "company_id": 1, "created_at": -1 })],
    )
    .await?;

    // Tasks
    create_indexes(
        db,
        "tasks",
        vec![
            index(bson::doc! { "company_id": 1, "project_id": 1, "created_at": 1 }),
            index(bson::doc! { "company_id": 1, "status": 1 }),
        ],
    )
    .await?;

    // Task assignments
    create_indexes(
        db,
        "task_assignments",
        vec![
            index_unique(bson::doc! { "task_id": 1, "team_member_id": 1 }),
            index(bson::doc! { "company_id": 1, "team_member_id": 1 }),
        ],
    )
    .await?;

    // Clients
    create_indexes(
        db,
        "clients",
        vec![index(bson::doc! { "company_id": 1, "name": 1 })],
    )
    .await?;

    // Comments
    create_indexes(
        db,
        "comments",
        vec![index(bson::doc! { "company_id": 1, "task_id": 1, "created_at": 1 })],
    )
    .await?;

    // Notes
    create_indexes(
        db,
        "notes",
        vec![index(bson::doc! { "company_id": 1, "created_at": -1 })],
    )
    .await?;

    // Assets
    create_indexes(
        db,
        "assets",
        vec![index(bson::doc! { "company_id": 1, "project_id": 1 })],
    )
    .await?;

    // Revoked credentials: rows expire with the credential they block.
    create_indexes(
        db,
        "revoked_credentials",
        vec![
            index_unique(bson::doc! { "jti": 1 }),
            index_ttl(bson::doc! { "expires_at": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn index_unique_sparse(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).sparse(true).build())
        .build()
}

fn index_ttl(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .expire_after(std::time::Duration::from_secs(0))
                .build(),
        )
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
