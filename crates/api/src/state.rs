use crewdeck_config::Settings;
use crewdeck_services::{
    IdentityService,
    dao::{
        asset::AssetDao, client::ClientDao, comment::CommentDao, company::CompanyDao,
        note::NoteDao, project::ProjectDao, revocation::RevocationDao, task::TaskDao,
        team_member::TeamMemberDao, user_profile::UserProfileDao,
    },
};
use mongodb::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub identity: Arc<IdentityService>,
    pub profiles: Arc<UserProfileDao>,
    pub companies: Arc<CompanyDao>,
    pub members: Arc<TeamMemberDao>,
    pub projects: Arc<ProjectDao>,
    pub tasks: Arc<TaskDao>,
    pub clients: Arc<ClientDao>,
    pub comments: Arc<CommentDao>,
    pub notes: Arc<NoteDao>,
    pub assets: Arc<AssetDao>,
    pub revocations: Arc<RevocationDao>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let identity = Arc::new(IdentityService::new(settings.auth.clone()));
        let profiles = Arc::new(UserProfileDao::new(&db));
        let companies = Arc::new(CompanyDao::new(&db));
        let members = Arc::new(TeamMemberDao::new(&db));
        let projects = Arc::new(ProjectDao::new(&db));
        let tasks = Arc::new(TaskDao::new(&db));
        let clients = Arc::new(ClientDao::new(&db));
        let comments = Arc::new(CommentDao::new(&db));
        let notes = Arc::new(NoteDao::new(&db));
        let assets = Arc::new(AssetDao::new(&db));
        let revocations = Arc::new(RevocationDao::new(&db));

        Self {
            db,
            settings,
            identity,
            profiles,
            companies,
            members,
            projects,
            tasks,
            clients,
            comments,
            notes,
            assets,
            revocations,
        }
    }
}
