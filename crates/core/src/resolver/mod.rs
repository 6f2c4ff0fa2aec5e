mod engine;

pub use engine::RouteResolver;
