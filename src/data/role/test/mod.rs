use crate::data::role::{DatabaseRoleStore, JsonRoleStore, RoleStore};
use crate::error::store::StoreError;
use crate::model::role::RoleChange;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use test_utils::{builder::TestBuilder, factory};

mod json;
