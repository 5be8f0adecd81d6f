pub use super::member::Entity as Member;
