pub mod json_api;


pub use json_api::{
    fast_sim_json, generate_schedule_json, simulate_game_json, FastSimRequest, GameRequest, GameResponse,
    ScheduleRequest, SCHEMA_VERSION,
};
