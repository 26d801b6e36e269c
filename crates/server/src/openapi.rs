use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct CompanyRequestDoc {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    /// `yyyy/MM/dd`
    #[schema(example = "2001/11/12")]
    pub founded_date: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct CompanyResponseDoc {
    pub id_company: i32,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    #[schema(example = "2001/11/12")]
    pub founded_date: Option<String>,
    pub users: Vec<UserResponseDoc>,
}

#[allow(clippy::upper_case_acronyms)]
#[derive(utoipa::ToSchema)]
pub enum RoleDoc { CEO, CTO, MANAGER, HR, EMPLOYEE }

#[derive(utoipa::ToSchema)]
pub struct UserRequestDoc {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    /// Required on create; empty or absent on update keeps the current password
    pub password: Option<String>,
    pub address: Option<String>,
    #[schema(example = "1999-01-02")]
    pub date_of_birth: Option<String>,
    pub role: Option<RoleDoc>,
    /// Required on create
    pub company_id: Option<i32>,
}

#[derive(utoipa::ToSchema)]
pub struct UserResponseDoc {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    #[schema(example = "1999-01-02")]
    pub date_of_birth: Option<String>,
    pub role: Option<RoleDoc>,
    pub company_id: i32,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::companies::create,
        crate::routes::companies::update,
        crate::routes::companies::get,
        crate::routes::companies::list,
        crate::routes::companies::delete,
        crate::routes::users::create,
        crate::routes::users::update,
        crate::routes::users::get,
        crate::routes::users::list,
        crate::routes::users::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CompanyRequestDoc,
            CompanyResponseDoc,
            RoleDoc,
            UserRequestDoc,
            UserResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "companies"),
        (name = "users")
    )
)]
pub struct ApiDoc;
