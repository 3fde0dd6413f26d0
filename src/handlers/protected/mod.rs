// Routes behind jwt_auth_middleware; every handler receives an AuthUser extension
pub mod ai; // /api/ai/* metered generation
pub mod user; // /api/user/* creation listings and likes
