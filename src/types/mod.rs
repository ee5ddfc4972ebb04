pub mod city;
pub mod hemisphere;
pub mod lat_lon;
pub mod observation;
pub mod weather_variable;
