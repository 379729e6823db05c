use crate::key::key;

key!(PrivateKey);
