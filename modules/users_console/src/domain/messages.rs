//! User-visible notification texts.

pub const FETCH_FAILED: &str = "Failed to fetch users!";
pub const UPDATE_OK: &str = "User updated successfully!";
pub const UPDATE_FAILED: &str = "Failed to update user!";
pub const DELETE_OK: &str = "User deleted successfully!";
pub const DELETE_FAILED: &str = "Failed to delete user!";
pub const UNAUTHORIZED: &str = "Unauthorized! Please login first.";
pub const LOGIN_OK: &str = "Login Successful!";
pub const LOGIN_FAILED: &str = "Invalid email or password!";
