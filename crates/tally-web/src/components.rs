mod credentials_form;
mod login_view;
mod main_view;
mod new_task_form;
mod signup_view;
mod task_filters;
mod task_row;

pub use credentials_form::CredentialsForm;
pub use login_view::LoginView;
pub use main_view::MainView;
pub use new_task_form::NewTaskForm;
pub use signup_view::SignupView;
pub use task_filters::TaskFilters;
pub use task_row::TaskRow;
