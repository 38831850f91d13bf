pub mod cattle;
pub mod cattle_complaint;
pub mod farmer;
pub mod shelter;
pub mod vet;

pub use cattle::Entity as Cattle;
pub use cattle_complaint::Entity as CattleComplaint;
pub use farmer::Entity as Farmer;
pub use shelter::Entity as Shelter;
pub use vet::Entity as Vet;
