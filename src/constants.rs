//! Audit action names and shared limits.

pub const COURSE_ADDED: &str = "COURSE_ADDED";
pub const COURSE_UPDATED: &str = "COURSE_UPDATED";
pub const COURSE_DELETED: &str = "COURSE_DELETED";
pub const TEACHER_ADDED: &str = "TEACHER_ADDED";
pub const TEACHER_UPDATED: &str = "TEACHER_UPDATED";
pub const TEACHER_DELETED: &str = "TEACHER_DELETED";
pub const TEACHER_ASSIGNED: &str = "TEACHER_ASSIGNED";
pub const STUDENT_ENROLLED: &str = "STUDENT_ENROLLED";
pub const STUDENT_UPDATED: &str = "STUDENT_UPDATED";
pub const STUDENT_DELETED: &str = "STUDENT_DELETED";
pub const PAYMENT_RECORDED: &str = "PAYMENT_RECORDED";
pub const PAYMENT_DELETED: &str = "PAYMENT_DELETED";
pub const ATTENDANCE_MARKED: &str = "ATTENDANCE_MARKED";
pub const ACCOUNT_REGISTERED: &str = "ACCOUNT_REGISTERED";

pub const MAX_NAME_LEN: usize = 100;
