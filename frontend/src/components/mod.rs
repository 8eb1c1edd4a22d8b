//! UI 组件层
//!
//! 页面按业务域分组：采购 / 生产 / 配送，外加认证与框架页。

pub mod header;
pub mod home;
pub mod login;
pub mod profile;
pub mod register;
pub mod unauthorized;

pub mod procurement {
    pub mod materials;
    pub mod suppliers;
    pub mod supply_orders;
}

pub mod production {
    pub mod bill_of_materials;
    pub mod production_orders;
    pub mod products;
}

pub mod delivery {
    pub mod customer_detail;
    pub mod customers;
    pub mod deliveries;
    pub mod orders;
}
