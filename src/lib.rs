pub mod game_theory {
    pub mod game_type;
    pub mod index_sets;
    pub mod padded_function;
}
pub mod optimisation_algorithms {
    pub mod linear_programming;
    pub mod microlp_solver;
    pub mod solver;
}
pub mod techniques {
    pub mod constant_toll_poa;
    pub mod dual_poa;
    pub mod optimal_poa;
    pub mod primal_poa;
}
