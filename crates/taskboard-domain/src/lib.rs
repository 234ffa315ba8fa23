pub mod column;
pub mod commands;
pub mod drag;
pub mod field_update;
pub mod member;
pub mod notification;
pub mod patch;
pub mod projection;
pub mod reconcile;
pub mod state;
pub mod task;

pub use column::{normalize_key, slugify, Column, ColumnId, DEFAULT_COLUMNS};
pub use drag::{
    ActivationConstraints, DragController, DragState, DropRequest, InputModality,
    NoopScrollLock, Point, ScrollLock,
};
pub use field_update::FieldUpdate;
pub use member::{MemberId, MemberRole, TeamMember, UserId, MEMBER_COLORS};
pub use notification::{due_soon, NotificationKind, NotificationRequest};
pub use patch::{ColumnPatch, NewColumn, NewTask, TaskPatch};
pub use projection::{
    backfill_column_ids, orphaned_tasks, project, resolve_column_id, BoardProjection, Lane,
};
pub use reconcile::{
    array_move, reconcile, DragItem, DropTarget, FailurePolicy, Intent, NoOpReason,
    ReconcileKind, Reconciliation, COLUMN_DRAG_PREFIX,
};
pub use state::BoardState;
pub use task::{LegacyStatus, OrganizationId, Task, TaskId, TaskPriority};
