pub mod application {
    pub mod cart {
        pub mod add_to_cart;
        pub mod apply_mutation;
        pub mod cache;
        pub mod delete;
        pub mod get_cart;
        pub mod get_item;
        pub mod update;
        pub mod worker;
    }
}

pub mod domain {
    pub mod broker;
    pub mod cache;
    pub mod errors;
    pub mod logger;
    pub mod shared {
        pub mod value_objects;
    }
    pub mod cart {
        pub mod command;
        pub mod errors;
        pub mod model;
        pub mod repository;
        pub mod snapshot;
        pub mod use_cases {
            pub mod add_to_cart;
            pub mod apply_mutation;
            pub mod delete;
            pub mod get_cart;
            pub mod get_item;
            pub mod update;
        }
    }
    pub mod product {
        pub mod model;
        pub mod repository;
    }
}

#[cfg(test)]
mod test_support;
