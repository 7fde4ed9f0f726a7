mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from taskly for tests
pub use taskly::core::db::{
    BoundProjectRepository, Briefing, BriefingRepository, Client, ClientRepository, ClientUpdate,
    Comment, CommentRepository, NewBriefing, NewClient, NewComment, NewProject, NewTask, Page,
    PageRequest, Project, ProjectDb, ProjectRepository, ProjectUpdate, Task, TaskRepository,
    TaskStatus, TaskUpdate, WorkspaceDb, WorkspaceRepository,
};
