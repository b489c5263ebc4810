pub mod board;
pub mod task;
pub mod user;

pub use board::{Board, BoardQuery, CreateBoardCommand, CreateBoardDto, UpdateBoardDto};
pub use task::{CreateTaskDto, Task, TaskPriority, TaskQuery, TaskStatus, UpdateTaskDto};
pub use user::{UpdateUserDto, UpdateUserStatusDto, User, UserDto, UserQuery, UserRole};
